//! 数据加载模块
//!
//! 提供样本清单、数据划分、变换、数据集与批处理功能。
//!
//! # 主要组件
//!
//! - [`DataManifest`]: CSV 样本清单
//! - [`DataPartitions`]: 训练/验证/测试划分（按比例随机抽取）
//! - [`transforms`]: 预处理、数据增强与后处理变换
//! - [`ImageDataset`] / [`TensorDataset`]: 数据集
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`DatasetFactory`] / [`DataloaderFactory`]: 按划分角色构造数据集与加载器
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use only_synth::data::{DataLoader, TensorDataset};
//!
//! let dataset = TensorDataset::new(images, None);
//! let mut loader = DataLoader::new(Box::new(dataset), 32)
//!     .shuffle(true)
//!     .seed(42);
//!
//! for batch in loader.iter() {
//!     let batch = batch?;
//! }
//! ```

mod dataloader;
mod dataset;
pub mod error;
mod factory;
mod manifest;
mod partition;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use dataloader::{DataLoader, DataLoaderIterator};
pub use dataset::{Dataset, ImageDataset, TensorDataset};
pub use error::DataError;
pub use factory::{DataloaderFactory, DatasetFactory};
pub use manifest::{DataManifest, ManifestRow};
pub use partition::{DataPartitions, validate_ratios};
pub use transforms::{Compose, DataRole, Transform, TransformEnum};
