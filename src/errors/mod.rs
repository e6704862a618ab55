/*
 * @Date         : 2026-02-03
 * @Description  : 全局错误类型
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::data::DataError;

mod compare;
pub use self::compare::ComparisonOperator;

/// 对抗生成训练过程中可能出现的所有（致命）错误
///
/// 注：NaN 损失并不在此列：它属于可恢复的数值不稳定，只会跳过当前批次的优化器更新。
#[derive(Error, Debug)]
pub enum SynthError {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓前置条件↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    #[error("{value_name}须{operator}{threshold}，实际为{actual}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: f64,
        actual: f64,
    },
    #[error("推理时必须指定生成样本的数量（且须大于0）")]
    MissingInferenceCount,
    #[error("验证集与测试集的比例之和须≤1，实际为{val_ratio}+{test_ratio}")]
    RatioSumExceeded { val_ratio: f64, test_ratio: f64 },
    #[error("配置文件中缺少必需参数`{0}`")]
    MissingConfigKey(String),
    #[error("配置参数`{key}`无效：{reason}")]
    InvalidConfig { key: String, reason: String },
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑前置条件↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓不支持的配置组合↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    #[error("模型族`{family}`不支持调度器`{scheduler}`")]
    UnsupportedScheduler { family: String, scheduler: String },
    #[error("未知的{kind}：`{name}`")]
    UnknownComponent { kind: &'static str, name: String },
    #[error("模型族`{family}`不支持标注范式`{paradigm}`")]
    UnsupportedLabeling { family: String, paradigm: String },
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑不支持的配置组合↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓张量/网络↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    #[error("形状不匹配（{context}）：期望{expected:?}，实际{got:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("网络`{0}`在前向传播之前就执行了反向传播")]
    BackwardBeforeForward(String),
    #[error("无法导出图像：{0}")]
    ImageExport(String),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑张量/网络↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓外部错误↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("读取配置文件{path:?}失败: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("配置解析错误: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("图像写入错误: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑外部错误↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

impl SynthError {
    /// 便捷构造：检查`actual`是否满足与`threshold`的比较关系，不满足则返回错误
    pub fn check(
        value_name: &str,
        actual: f64,
        operator: ComparisonOperator,
        threshold: f64,
    ) -> Result<(), SynthError> {
        if operator.holds(actual, threshold) {
            Ok(())
        } else {
            Err(SynthError::ValueMustSatisfyComparison {
                value_name: value_name.to_string(),
                operator,
                threshold,
                actual,
            })
        }
    }

    pub(crate) fn invalid_config(key: &str, reason: impl Into<String>) -> Self {
        SynthError::InvalidConfig {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
