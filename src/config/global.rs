use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::TransformEnum;
use crate::errors::{ComparisonOperator, SynthError};

/// 全局（非模型）配置：训练轮数、数据加载与变换、指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub num_epochs: usize,
    pub batch_size: usize,
    pub shuffle: bool,
    pub drop_last: bool,
    pub seed: u64,
    /// 指标名称列表
    pub metrics: Vec<String>,
    /// 按划分角色（`train`/`val`/`test`）给出的预处理变换
    pub data_preprocessing: BTreeMap<String, Vec<TransformEnum>>,
    /// 按划分角色给出的数据增强，只有`train`会被使用
    pub data_augmentations: BTreeMap<String, Vec<TransformEnum>>,
    /// 推理结果的后处理变换
    pub data_postprocessing: Vec<TransformEnum>,
}

impl GlobalConfig {
    pub fn validate(&self) -> Result<(), SynthError> {
        SynthError::check(
            "batch_size",
            self.batch_size as f64,
            ComparisonOperator::GreaterThan,
            0.0,
        )
    }
}
