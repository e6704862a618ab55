/*
 * @Date         : 2026-02-06
 * @Description  : 配置解析：读取 YAML、校验必需参数、填充缺省值（每个缺省值一条警告），
 *                 最后反序列化为强类型的`GlobalConfig`与`ModelConfig`
 */

mod defaults;
mod global;
mod model;

#[cfg(test)]
mod tests;

pub use defaults::{REQUIRED_MODEL_PARAMETERS, REQUIRED_PARAMETERS};
pub use global::GlobalConfig;
pub use model::{
    Architecture, ClipMode, LabelingParadigm, ModelConfig, ModelFamily, NetworkRole,
    OptimizerSpec, OutputActivation, PerNetwork, SchedulerPolicy, SchedulerSpec, SchedulerSpecs,
};

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::errors::SynthError;

/// 配置管理器
///
/// # 使用示例
/// ```ignore
/// let (global_config, model_config) = ConfigManager::new("config.yaml").prepare_configs()?;
/// ```
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// 读取并解析配置文件
    pub fn prepare_configs(&self) -> Result<(GlobalConfig, ModelConfig), SynthError> {
        let text =
            std::fs::read_to_string(&self.config_path).map_err(|source| SynthError::ConfigIo {
                path: self.config_path.clone(),
                source,
            })?;
        prepare_configs_from_str(&text)
    }
}

/// 从 YAML 文本解析配置
pub fn prepare_configs_from_str(text: &str) -> Result<(GlobalConfig, ModelConfig), SynthError> {
    prepare_configs_from_value(serde_yaml::from_str(text)?)
}

/// 从已解析的 YAML 值解析配置
pub fn prepare_configs_from_value(config: Value) -> Result<(GlobalConfig, ModelConfig), SynthError> {
    let Value::Mapping(mut root) = config else {
        return Err(SynthError::invalid_config("<root>", "配置文件的顶层必须是映射"));
    };
    validate_required(&root, REQUIRED_PARAMETERS, None)?;

    let Some(Value::Mapping(mut model)) = root.remove("model_config") else {
        return Err(SynthError::invalid_config("model_config", "必须是映射"));
    };
    validate_required(&model, REQUIRED_MODEL_PARAMETERS, Some("model_config"))?;

    fill_defaults(&mut root, defaults::basic_parameter_defaults(), "");
    fill_defaults(&mut model, defaults::model_parameter_defaults(), "model_config.");

    let model_config: ModelConfig = serde_yaml::from_value(Value::Mapping(model))?;
    model_config.validate()?;
    let global_config: GlobalConfig = serde_yaml::from_value(Value::Mapping(root))?;
    global_config.validate()?;
    Ok((global_config, model_config))
}

fn validate_required(
    mapping: &Mapping,
    required: &[&str],
    scope: Option<&str>,
) -> Result<(), SynthError> {
    for &key in required {
        if !mapping.contains_key(key) {
            let full_key = match scope {
                Some(scope) => format!("{scope}.{key}"),
                None => key.to_string(),
            };
            return Err(SynthError::MissingConfigKey(full_key));
        }
    }
    Ok(())
}

fn fill_defaults(mapping: &mut Mapping, defaults: Vec<(&'static str, Value)>, prefix: &str) {
    for (key, value) in defaults {
        if !mapping.contains_key(key) {
            warn!(
                "配置文件中未找到参数`{prefix}{key}`，使用缺省值：{}",
                display_value(&value)
            );
            mapping.insert(Value::from(key), value);
        }
    }
}

fn display_value(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| format!("{value:?}"))
}
