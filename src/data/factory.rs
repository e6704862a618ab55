/*
 * @Date         : 2026-02-05
 * @Description  : 数据集与 DataLoader 的工厂
 */

use std::path::PathBuf;

use super::{Compose, DataLoader, DataManifest, Dataset, ImageDataset};
use crate::config::{GlobalConfig, LabelingParadigm};
use crate::errors::SynthError;

/// 按标注范式构造数据集
#[derive(Debug, Clone, Default)]
pub struct DatasetFactory {
    /// 清单自身没有基准目录时使用的根目录
    base_dir: Option<PathBuf>,
}

impl DatasetFactory {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// `sample_shape`为单个样本的形状，如[C, H, W]
    pub fn get_dataset(
        &self,
        manifest: DataManifest,
        transform: Option<Compose>,
        labeling_paradigm: LabelingParadigm,
        sample_shape: &[usize],
    ) -> Result<Box<dyn Dataset>, SynthError> {
        match labeling_paradigm {
            LabelingParadigm::Unlabeled => Ok(Box::new(ImageDataset::new(
                manifest,
                sample_shape,
                self.base_dir.clone(),
                transform,
            )?)),
            other => Err(SynthError::UnsupportedLabeling {
                family: "dataset".to_string(),
                paradigm: other.to_string(),
            }),
        }
    }
}

/// 每种数据划分各有一个构造方法：训练集按配置打乱/丢弃不完整批次，验证与测试集保持顺序
#[derive(Debug, Clone)]
pub struct DataloaderFactory {
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: u64,
}

impl DataloaderFactory {
    pub fn new(batch_size: usize, shuffle: bool, drop_last: bool, seed: u64) -> Self {
        Self {
            batch_size,
            shuffle,
            drop_last,
            seed,
        }
    }

    pub fn from_config(config: &GlobalConfig) -> Self {
        Self::new(config.batch_size, config.shuffle, config.drop_last, config.seed)
    }

    pub fn get_training_dataloader(&self, dataset: Box<dyn Dataset>) -> DataLoader {
        DataLoader::new(dataset, self.batch_size)
            .shuffle(self.shuffle)
            .drop_last(self.drop_last)
            .seed(self.seed)
    }

    pub fn get_validation_dataloader(&self, dataset: Box<dyn Dataset>) -> DataLoader {
        DataLoader::new(dataset, self.batch_size).seed(self.seed.wrapping_add(1))
    }

    pub fn get_testing_dataloader(&self, dataset: Box<dyn Dataset>) -> DataLoader {
        DataLoader::new(dataset, self.batch_size).seed(self.seed.wrapping_add(2))
    }
}
