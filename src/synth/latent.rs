/*
 * @Date         : 2026-02-07
 * @Description  : 潜向量采样：每步随机采样，以及用于导出的固定种子潜向量
 */

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::ModelConfig;
use crate::tensor::Tensor;

/// 潜向量采样器
///
/// `n`个潜向量的形状为`[n, latent, 1, 1]`（三维模型为`[n, latent, 1, 1, 1]`），服从 N(0, 1)。
#[derive(Debug, Clone)]
pub struct LatentSampler {
    latent_size: usize,
    n_dimensions: usize,
    rng: StdRng,
    fixed_seed: u64,
}

impl LatentSampler {
    pub fn new(latent_size: usize, n_dimensions: usize, seed: u64, fixed_seed: u64) -> Self {
        Self {
            latent_size,
            n_dimensions,
            rng: StdRng::seed_from_u64(seed),
            fixed_seed,
        }
    }

    /// 随机流的种子由`init_seed`派生，与权重初始化的随机流相互独立
    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(
            config.architecture.latent_vector_size,
            config.n_dimensions,
            config.init_seed.wrapping_add(1),
            config.fixed_latent_vector_seed,
        )
    }

    pub fn shape(&self, n: usize) -> Vec<usize> {
        let mut shape = vec![n, self.latent_size];
        shape.extend(std::iter::repeat_n(1, self.n_dimensions));
        shape
    }

    /// 采样`n`个新的潜向量（推进内部随机流）
    pub fn sample(&mut self, n: usize) -> Tensor {
        let shape = self.shape(n);
        Tensor::normal_with_rng(0.0, 1.0, &shape, &mut self.rng)
    }

    /// 固定种子的潜向量：同样的`n`总是得到同样的张量
    pub fn fixed(&self, n: usize) -> Tensor {
        Tensor::normal_seeded(0.0, 1.0, &self.shape(n), self.fixed_seed)
    }
}
