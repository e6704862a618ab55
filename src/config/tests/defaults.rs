use super::MINIMAL_CONFIG;
use crate::config::{
    ClipMode, ConfigManager, LabelingParadigm, OutputActivation, SchedulerPolicy,
    prepare_configs_from_str,
};
use crate::errors::SynthError;
use std::io::Write;

#[test]
fn test_minimal_config_gets_defaults() -> Result<(), SynthError> {
    let (global, model) = prepare_configs_from_str(MINIMAL_CONFIG)?;

    assert_eq!(global.num_epochs, 3);
    assert_eq!(global.batch_size, 16);
    assert!(global.shuffle);
    assert!(!global.drop_last);
    assert_eq!(global.seed, 42);
    assert!(global.metrics.is_empty());
    assert!(global.data_preprocessing.is_empty());
    assert!(global.data_postprocessing.is_empty());

    assert_eq!(model.labeling_paradigm, LabelingParadigm::Unlabeled);
    assert_eq!(model.n_dimensions, 2);
    assert!(!model.amp);
    assert_eq!(model.clip_grad, None);
    assert_eq!(model.clip_mode, ClipMode::Norm);
    assert!(model.schedulers.is_none());
    assert_eq!(model.save_eval_images_every_n_epochs, 1);
    assert_eq!(model.n_fixed_images_to_generate, 16);
    assert_eq!(model.fixed_images_batch_size, 8);
    assert_eq!(model.fixed_latent_vector_seed, 42);
    assert_eq!(model.scheduler_policy, SchedulerPolicy::EveryBatch);
    assert_eq!(model.init_seed, 42);
    Ok(())
}

#[test]
fn test_nested_defaults() -> Result<(), SynthError> {
    let (_, model) = prepare_configs_from_str(MINIMAL_CONFIG)?;
    assert_eq!(model.architecture.n_channels, 1);
    assert_eq!(model.architecture.generator_output, OutputActivation::Sigmoid);
    // `lr`是`learning_rate`的别名
    assert_eq!(model.optimizers.generator.learning_rate, 0.001);
    assert_eq!(model.optimizers.discriminator.learning_rate, 2e-4);
    assert_eq!(model.optimizers.discriminator.betas, [0.5, 0.999]);
    assert_eq!(model.sample_shape(), vec![1, 4, 4]);
    Ok(())
}

#[test]
fn test_explicit_values_are_kept() -> Result<(), SynthError> {
    let yaml = format!(
        "{MINIMAL_CONFIG}
  clip_grad: 0.5
  clip_mode: value
  scheduler_policy: after_update
  schedulers:
    discriminator:
      name: step
      step_size: 2
batch_size: 4
metrics: [mse, ssim]
data_preprocessing:
  train:
    - type: normalize
      mean: 0.5
      std: 0.5
"
    );
    let (global, model) = prepare_configs_from_str(&yaml)?;
    assert_eq!(global.batch_size, 4);
    assert_eq!(global.metrics, vec!["mse".to_string(), "ssim".to_string()]);
    assert_eq!(global.data_preprocessing["train"].len(), 1);
    assert_eq!(model.clip_grad, Some(0.5));
    assert_eq!(model.clip_mode, ClipMode::Value);
    assert_eq!(model.scheduler_policy, SchedulerPolicy::AfterUpdate);
    let schedulers = model.schedulers.unwrap_or_default();
    assert!(schedulers.generator.is_none());
    assert_eq!(schedulers.discriminator.map(|s| s.step_size), Some(2));
    Ok(())
}

#[test]
fn test_config_manager_reads_file() -> Result<(), SynthError> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(MINIMAL_CONFIG.as_bytes())?;
    let (global, model) = ConfigManager::new(file.path()).prepare_configs()?;
    assert_eq!(global.num_epochs, 3);
    assert_eq!(model.model_name, "dcgan");

    let missing = ConfigManager::new("/no/such/config.yaml").prepare_configs();
    assert!(matches!(missing, Err(SynthError::ConfigIo { .. })));
    Ok(())
}
