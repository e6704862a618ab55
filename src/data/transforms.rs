/*
 * @Date         : 2026-02-05
 * @Description  : 数据变换：预处理、数据增强与后处理共用同一组逐样本变换。
 *                 样本形状约定为[C, H, W]（二维）或[C, D, H, W]（三维）。
 */

use std::collections::BTreeMap;

use enum_dispatch::enum_dispatch;
use ndarray::Axis;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

/// 单个变换的公共接口
#[enum_dispatch]
pub trait Transform {
    /// 对单个样本（或整批）施加变换；随机变换从`rng`取随机数
    fn apply(&self, sample: &Tensor, rng: &mut StdRng) -> Tensor;
}

/// 所有可配置的变换。配置写法：`{type: normalize, mean: 0.5, std: 0.5}`
#[enum_dispatch(Transform)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformEnum {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓确定性变换↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Normalize(Normalize),
    Rescale(Rescale),
    Clamp(Clamp),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑确定性变换↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓随机变换↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    FlipHorizontal(FlipHorizontal),
    FlipVertical(FlipVertical),
    GaussianNoise(GaussianNoise),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑随机变换↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

/// (x - mean) / std
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalize {
    pub mean: f32,
    pub std: f32,
}

impl Transform for Normalize {
    fn apply(&self, sample: &Tensor, _rng: &mut StdRng) -> Tensor {
        let (mean, std) = (self.mean, self.std);
        sample.map(|x| (x - mean) / std)
    }
}

/// 把样本的[最小值, 最大值]线性映射到[min, max]；常量样本映射为`min`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rescale {
    #[serde(default)]
    pub min: f32,
    #[serde(default = "one")]
    pub max: f32,
}

impl Transform for Rescale {
    fn apply(&self, sample: &Tensor, _rng: &mut StdRng) -> Tensor {
        let (lo, hi) = (sample.min(), sample.max());
        let range = hi - lo;
        let (min, max) = (self.min, self.max);
        if range <= 0.0 {
            return sample.map(|_| min);
        }
        sample.map(|x| min + (x - lo) / range * (max - min))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clamp {
    pub min: f32,
    pub max: f32,
}

impl Transform for Clamp {
    fn apply(&self, sample: &Tensor, _rng: &mut StdRng) -> Tensor {
        let (min, max) = (self.min, self.max);
        sample.map(|x| {
            if x < min {
                min
            } else if x > max {
                max
            } else {
                x
            }
        })
    }
}

/// 以概率`probability`沿宽度（最后一维）翻转
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipHorizontal {
    #[serde(default = "half")]
    pub probability: f64,
}

impl Transform for FlipHorizontal {
    fn apply(&self, sample: &Tensor, rng: &mut StdRng) -> Tensor {
        flip_axis(sample, 1, self.probability, rng)
    }
}

/// 以概率`probability`沿高度（倒数第二维）翻转
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipVertical {
    #[serde(default = "half")]
    pub probability: f64,
}

impl Transform for FlipVertical {
    fn apply(&self, sample: &Tensor, rng: &mut StdRng) -> Tensor {
        flip_axis(sample, 2, self.probability, rng)
    }
}

/// 以概率`probability`叠加 N(0, std²) 噪声
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNoise {
    pub std: f32,
    #[serde(default = "one_f64")]
    pub probability: f64,
}

impl Transform for GaussianNoise {
    fn apply(&self, sample: &Tensor, rng: &mut StdRng) -> Tensor {
        if !fires(self.probability, rng) {
            return sample.clone();
        }
        let noise = Tensor::normal_with_rng(0.0, self.std, sample.shape(), rng);
        let mut noisy = sample.clone();
        *noisy.data_mut() += noise.data();
        noisy
    }
}

fn one() -> f32 {
    1.0
}

fn one_f64() -> f64 {
    1.0
}

fn half() -> f64 {
    0.5
}

fn fires(probability: f64, rng: &mut StdRng) -> bool {
    probability > 0.0 && rng.gen_range(0.0..1.0) < probability
}

/// 翻转倒数第`from_end`维（维数不够时原样返回）
fn flip_axis(sample: &Tensor, from_end: usize, probability: f64, rng: &mut StdRng) -> Tensor {
    let ndim = sample.dimension();
    if ndim < from_end || !fires(probability, rng) {
        return sample.clone();
    }
    let mut flipped = sample.data().clone();
    flipped.invert_axis(Axis(ndim - from_end));
    Tensor::from_array(flipped.as_standard_layout().to_owned())
}

/// 按顺序组合多个变换
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compose {
    transforms: Vec<TransformEnum>,
}

impl Compose {
    pub fn new(transforms: Vec<TransformEnum>) -> Self {
        Self { transforms }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn apply(&self, sample: &Tensor, rng: &mut StdRng) -> Tensor {
        self.transforms
            .iter()
            .fold(sample.clone(), |acc, t| t.apply(&acc, rng))
    }

    /// 为某个数据划分组装变换：预处理对所有划分生效，数据增强仅用于训练集。
    /// 两者都为空时返回`None`。
    pub fn for_role(
        preprocessing: &BTreeMap<String, Vec<TransformEnum>>,
        augmentations: &BTreeMap<String, Vec<TransformEnum>>,
        role: DataRole,
    ) -> Option<Compose> {
        let mut transforms = Vec::new();
        if let Some(ops) = preprocessing.get(role.as_str()) {
            transforms.extend(ops.iter().cloned());
        }
        if role == DataRole::Train {
            if let Some(ops) = augmentations.get(role.as_str()) {
                transforms.extend(ops.iter().cloned());
            }
        }
        if transforms.is_empty() {
            None
        } else {
            Some(Compose::new(transforms))
        }
    }
}

/// 数据划分的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataRole {
    Train,
    Validation,
    Test,
}

impl DataRole {
    /// 配置文件中使用的键名
    pub fn as_str(&self) -> &'static str {
        match self {
            DataRole::Train => "train",
            DataRole::Validation => "val",
            DataRole::Test => "test",
        }
    }
}
