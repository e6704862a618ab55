/*
 * @Date         : 2026-02-05
 * @Description  : 数据集：按下标取出单个（已变换的）样本
 */

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;

use super::{Compose, DataError, DataManifest};
use crate::errors::SynthError;
use crate::tensor::Tensor;

/// 数据集 trait
///
/// 随机的数据增强从调用方传入的`rng`取随机数，保证同一种子下结果可复现。
pub trait Dataset {
    /// 样本数量
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 取出第`index`个样本，形状为`sample_shape()`
    fn get(&self, index: usize, rng: &mut StdRng) -> Result<Tensor, SynthError>;

    /// 单个样本的形状，如[C, H, W]
    fn sample_shape(&self) -> &[usize];
}

/// 持有内存中样本的数据集（形状为`[N, ...]`的单个张量）
///
/// # 示例
/// ```ignore
/// let dataset = TensorDataset::new(images, None);
/// println!("样本数: {}", dataset.len());
/// ```
#[derive(Debug, Clone)]
pub struct TensorDataset {
    samples: Tensor,
    sample_shape: Vec<usize>,
    transform: Option<Compose>,
}

impl TensorDataset {
    /// 创建新的 TensorDataset，`samples`的第一维为样本数
    pub fn new(samples: Tensor, transform: Option<Compose>) -> Self {
        let sample_shape = samples.sample_shape().to_vec();
        Self {
            samples,
            sample_shape,
            transform,
        }
    }

    pub fn samples(&self) -> &Tensor {
        &self.samples
    }
}

impl Dataset for TensorDataset {
    fn len(&self) -> usize {
        self.samples.batch_size()
    }

    fn get(&self, index: usize, rng: &mut StdRng) -> Result<Tensor, SynthError> {
        if index >= self.len() {
            return Err(DataError::IndexOutOfBounds {
                index,
                len: self.len(),
            }
            .into());
        }
        let sample = self.samples.sample(index);
        Ok(match &self.transform {
            Some(transform) => transform.apply(&sample, rng),
            None => sample,
        })
    }

    fn sample_shape(&self) -> &[usize] {
        &self.sample_shape
    }
}

/// 由样本清单按需读取图像的数据集（二维图像）
///
/// 每个`Channel*`列是一张图像的路径：
/// - 若通道列数与`channels`相同，每列作为一个灰度通道；
/// - 若只有一个通道列且`channels`为3，该列按 RGB 图像读取。
///
/// 图像被缩放到`[H, W]`并除以255，最后施加变换。
#[derive(Debug, Clone)]
pub struct ImageDataset {
    manifest: DataManifest,
    channel_columns: Vec<usize>,
    /// [C, H, W]
    sample_shape: Vec<usize>,
    base_dir: Option<PathBuf>,
    transform: Option<Compose>,
}

impl ImageDataset {
    pub fn new(
        manifest: DataManifest,
        sample_shape: &[usize],
        base_dir: Option<PathBuf>,
        transform: Option<Compose>,
    ) -> Result<Self, DataError> {
        if sample_shape.len() != 3 {
            return Err(DataError::FormatError(format!(
                "图像数据集只支持[C, H, W]形状的二维样本，实际为{sample_shape:?}"
            )));
        }
        let channel_columns = manifest.channel_columns();
        if channel_columns.is_empty() {
            return Err(DataError::FormatError(
                "样本清单中没有以`Channel`开头的列".to_string(),
            ));
        }
        let channels = sample_shape[0];
        let packed_rgb = channel_columns.len() == 1 && channels == 3;
        if channel_columns.len() != channels && !packed_rgb {
            return Err(DataError::ShapeMismatch {
                expected: vec![channels],
                got: vec![channel_columns.len()],
            });
        }
        // 清单自带的目录优先，外部给定的目录只用于内存中构造的清单
        let base_dir = manifest.base_dir().map(Path::to_path_buf).or(base_dir);
        Ok(Self {
            manifest,
            channel_columns,
            sample_shape: sample_shape.to_vec(),
            base_dir,
            transform,
        })
    }

    pub fn manifest(&self) -> &DataManifest {
        &self.manifest
    }

    fn resolve(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn load_channel(&self, row: usize, column: usize, channels: usize) -> Result<Tensor, SynthError> {
        let path = self.resolve(self.manifest.value(row, column)?);
        if !path.exists() {
            return Err(DataError::FileNotFound(path).into());
        }
        let image = image::open(&path).map_err(DataError::from)?;
        let (height, width) = (self.sample_shape[1], self.sample_shape[2]);
        Tensor::from_image(&image, channels, height, width)
    }
}

impl Dataset for ImageDataset {
    fn len(&self) -> usize {
        self.manifest.len()
    }

    fn get(&self, index: usize, rng: &mut StdRng) -> Result<Tensor, SynthError> {
        let channels = self.sample_shape[0];
        let raw = if self.channel_columns.len() == channels {
            let mut data = Vec::with_capacity(self.sample_shape.iter().product());
            for &column in &self.channel_columns {
                let channel = self.load_channel(index, column, 1)?;
                data.extend(channel.data().iter().copied());
            }
            Tensor::new(&data, &self.sample_shape)
        } else {
            self.load_channel(index, self.channel_columns[0], 3)?
        };
        let sample = raw.scaled(1.0 / 255.0);
        Ok(match &self.transform {
            Some(transform) => transform.apply(&sample, rng),
            None => sample,
        })
    }

    fn sample_shape(&self) -> &[usize] {
        &self.sample_shape
    }
}
