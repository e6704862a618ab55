//! 必需参数与缺省值表

use serde_yaml::{Mapping, Value};

/// 顶层必需参数
pub const REQUIRED_PARAMETERS: &[&str] = &["model_config", "num_epochs"];

/// `model_config`中的必需参数
pub const REQUIRED_MODEL_PARAMETERS: &[&str] =
    &["model_name", "architecture", "losses", "optimizers"];

/// 顶层参数的缺省值（含 DataLoader 参数）
pub fn basic_parameter_defaults() -> Vec<(&'static str, Value)> {
    vec![
        ("batch_size", Value::from(16)),
        ("shuffle", Value::from(true)),
        ("drop_last", Value::from(false)),
        ("seed", Value::from(42)),
        ("metrics", Value::Sequence(Vec::new())),
        ("data_preprocessing", Value::Mapping(Mapping::new())),
        ("data_augmentations", Value::Mapping(Mapping::new())),
        ("data_postprocessing", Value::Sequence(Vec::new())),
    ]
}

/// 模型参数的缺省值
pub fn model_parameter_defaults() -> Vec<(&'static str, Value)> {
    vec![
        ("labeling_paradigm", Value::from("unlabeled")),
        ("n_dimensions", Value::from(2)),
        ("amp", Value::from(false)),
        ("clip_grad", Value::Null),
        ("clip_mode", Value::from("norm")),
        ("schedulers", Value::Null),
        ("save_eval_images_every_n_epochs", Value::from(1)),
        ("n_fixed_images_to_generate", Value::from(16)),
        ("fixed_images_batch_size", Value::from(8)),
        ("fixed_latent_vector_seed", Value::from(42)),
        ("scheduler_policy", Value::from("every_batch")),
        ("init_seed", Value::from(42)),
    ]
}
