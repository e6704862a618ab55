/*
 * @Date         : 2026-02-03
 * @Description  : 张量：对`ndarray`动态维数组的轻量封装。
 *                 约定第0维为批（batch）维，如图像批次的形状为[N, C, H, W]。
 */

use ndarray::{Array, Array2, ArrayD, Axis, Dimension, IxDyn, Slice};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::errors::SynthError;

mod image;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量。`data`的长度必须和`shape`中所有元素的乘积相等。
    ///
    /// # Panics
    /// 若`data`长度与`shape`不符
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        let expected: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected,
            "Tensor::new: 数据长度{}与形状{:?}不符",
            data.len(),
            shape
        );
        let data = ArrayD::from_shape_fn(IxDyn(shape), |index| {
            data[flat_index(index.slice(), shape)]
        });
        Tensor { data }
    }

    pub fn from_array(data: ArrayD<f32>) -> Tensor {
        Tensor { data }
    }

    /// 由`[N, features]`矩阵还原出形状为`[N, sample_shape...]`的张量
    pub fn from_matrix(matrix: &Array2<f32>, sample_shape: &[usize]) -> Result<Tensor, SynthError> {
        let features: usize = sample_shape.iter().product();
        if matrix.ncols() != features {
            return Err(SynthError::ShapeMismatch {
                context: "矩阵还原为张量".to_string(),
                expected: sample_shape.to_vec(),
                got: vec![matrix.ncols()],
            });
        }
        let mut shape = Vec::with_capacity(sample_shape.len() + 1);
        shape.push(matrix.nrows());
        shape.extend_from_slice(sample_shape);
        let flat: Vec<f32> = matrix.iter().copied().collect();
        Ok(Tensor::new(&flat, &shape))
    }

    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor::full(shape, 0.0)
    }

    pub fn ones(shape: &[usize]) -> Tensor {
        Tensor::full(shape, 1.0)
    }

    /// 创建所有元素都为`value`的张量
    pub fn full(shape: &[usize], value: f32) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// 用给定的随机数生成器创建服从正态分布的张量（Box-Muller 变换）
    pub fn normal_with_rng<R: Rng>(mean: f32, std_dev: f32, shape: &[usize], rng: &mut R) -> Tensor {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.gen_range(0.0..1.0);
            let u2: f32 = rng.gen_range(0.0..1.0);
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor::new(&data, shape)
    }

    /// 用固定种子创建服从正态分布的张量，同一种子总是得到同一张量
    pub fn normal_seeded(mean: f32, std_dev: f32, shape: &[usize], seed: u64) -> Tensor {
        let mut rng = StdRng::seed_from_u64(seed);
        Tensor::normal_with_rng(mean, std_dev, shape, &mut rng)
    }

    /// 沿第0维拼接若干形状相同的样本，得到`[N, sample_shape...]`的批张量
    pub fn stack(samples: &[Tensor]) -> Result<Tensor, SynthError> {
        let first = samples.first().ok_or_else(|| SynthError::ShapeMismatch {
            context: "拼接空的样本列表".to_string(),
            expected: vec![1],
            got: vec![0],
        })?;
        let sample_shape = first.shape().to_vec();
        let mut flat = Vec::with_capacity(first.size() * samples.len());
        for sample in samples {
            if sample.shape() != sample_shape.as_slice() {
                return Err(SynthError::ShapeMismatch {
                    context: "拼接批次样本".to_string(),
                    expected: sample_shape,
                    got: sample.shape().to_vec(),
                });
            }
            flat.extend(sample.data.iter().copied());
        }
        let mut shape = vec![samples.len()];
        shape.extend_from_slice(&sample_shape);
        Ok(Tensor::new(&flat, &shape))
    }
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓属性↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 批大小，即第0维的长度（标量视为1）
    pub fn batch_size(&self) -> usize {
        self.shape().first().copied().unwrap_or(1)
    }

    /// 单个样本的形状，即去掉第0维后的形状
    pub fn sample_shape(&self) -> &[usize] {
        let shape = self.shape();
        if shape.is_empty() { shape } else { &shape[1..] }
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ArrayD<f32> {
        &mut self.data
    }

    /// 是否含有 NaN 元素
    pub fn has_nan(&self) -> bool {
        self.data.iter().any(|x| x.is_nan())
    }

    /// 所有元素的均值（空张量返回 NaN）
    pub fn mean(&self) -> f32 {
        if self.size() == 0 {
            return f32::NAN;
        }
        self.data.iter().sum::<f32>() / self.size() as f32
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑属性↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓变换↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    /// 展平为`[N, features]`矩阵（1维张量视为`[N, 1]`）
    pub fn to_matrix(&self) -> Array2<f32> {
        let rows = self.batch_size();
        let cols = if rows == 0 { 0 } else { self.size() / rows };
        let flat: Vec<f32> = self.data.iter().copied().collect();
        Array2::from_shape_fn((rows, cols), |(i, j)| flat[i * cols + j])
    }

    /// 取出第`index`个样本（去掉批维）
    pub fn sample(&self, index: usize) -> Tensor {
        Tensor {
            data: self.data.index_axis(Axis(0), index).to_owned(),
        }
    }

    /// 取出`[start, end)`区间内的样本，保留批维
    pub fn slice_batch(&self, start: usize, end: usize) -> Tensor {
        Tensor {
            data: self
                .data
                .slice_axis(Axis(0), Slice::from(start..end))
                .to_owned(),
        }
    }

    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor {
            data: self.data.mapv(f),
        }
    }

    pub fn scaled(&self, factor: f32) -> Tensor {
        self.map(|x| x * factor)
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑变换↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

fn flat_index(index: &[usize], shape: &[usize]) -> usize {
    index
        .iter()
        .zip(shape.iter())
        .fold(0, |acc, (&i, &dim)| acc * dim + i)
}
