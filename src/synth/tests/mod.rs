mod export;

use std::cell::Cell;

use crate::config::{ModelConfig, prepare_configs_from_str};
use crate::errors::SynthError;
use crate::nn::{BceLoss, Loss, LossOutput};
use crate::tensor::Tensor;

/// 小尺寸的 DCGAN 配置：1×2×2 的图像，4 维潜向量，两个网络都用 SGD
pub(super) fn small_config() -> ModelConfig {
    let yaml = "
num_epochs: 1
model_config:
  model_name: dcgan
  architecture:
    latent_vector_size: 4
    input_shape: [2, 2]
    generator_hidden: [8]
    discriminator_hidden: [8]
  losses:
    generator: bce
    discriminator: bce
  optimizers:
    generator:
      name: sgd
      lr: 0.05
    discriminator:
      name: sgd
      lr: 0.05
  n_fixed_images_to_generate: 10
  fixed_images_batch_size: 4
";
    let (_, config) = prepare_configs_from_str(yaml).expect("测试配置应能解析");
    config
}

/// 取值在(0, 1)内的真实批次，形状`[n, 1, 2, 2]`
pub(super) fn real_batch(n: usize) -> Tensor {
    let data: Vec<f32> = (0..n * 4).map(|i| 0.1 + 0.8 * (i % 7) as f32 / 7.0).collect();
    Tensor::new(&data, &[n, 1, 2, 2])
}

/// 第`bad_call`次（从0计）调用时返回非有限的损失（值与梯度都是`value`），其余时候等同于 BCE
pub(super) struct NonFiniteOnCall {
    bad_call: usize,
    value: f32,
    calls: Cell<usize>,
}

impl NonFiniteOnCall {
    pub(super) fn nan(bad_call: usize) -> Self {
        Self::with_value(bad_call, f32::NAN)
    }

    pub(super) fn with_value(bad_call: usize, value: f32) -> Self {
        Self {
            bad_call,
            value,
            calls: Cell::new(0),
        }
    }
}

impl Loss for NonFiniteOnCall {
    fn name(&self) -> &str {
        "non_finite_on_call"
    }

    fn compute(&self, prediction: &Tensor, target: &Tensor) -> Result<LossOutput, SynthError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call == self.bad_call {
            return Ok(LossOutput {
                value: self.value,
                grad: Tensor::full(prediction.shape(), self.value),
            });
        }
        BceLoss.compute(prediction, target)
    }
}
