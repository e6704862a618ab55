//! # Only Synth
//!
//! `only_synth`用纯rust实现生成式合成模型（对抗生成网络）的训练：
//! 判别器与生成器交替优化、NaN 损失的逐批保护、按 epoch 导出固定潜向量生成的检查点图像，
//! 以及训练/验证/测试的完整流程。
//!
//! ```ignore
//! let (global_config, model_config) = ConfigManager::new("config.yaml").prepare_configs()?;
//! let sources = DataSources::new(DataManifest::from_csv_path("train.csv")?).val_ratio(0.2);
//! let mut manager = TrainingManager::new(sources, "output", global_config, model_config)?;
//! manager.run_training()?;
//! ```

pub mod config;
pub mod data;
pub mod errors;
pub mod logging;
pub mod nn;
pub mod synth;
pub mod tensor;
pub mod training;
