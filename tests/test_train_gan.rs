/*
 * @Date         : 2026-02-08
 * @Description  : 端到端集成测试：YAML 配置 + CSV 清单 + PNG 图像 → 训练 → 检查点图像与训练历史
 */

use std::fs;
use std::path::Path;

use image::{GrayImage, Luma};
use only_synth::config::ConfigManager;
use only_synth::data::DataManifest;
use only_synth::errors::SynthError;
use only_synth::training::{DataSources, TrainingManager};

const CONFIG: &str = "
num_epochs: 3
batch_size: 4
shuffle: true
seed: 11
metrics: [mse, psnr]
data_preprocessing:
  train:
    - type: clamp
      min: 0.0
      max: 1.0
data_augmentations:
  train:
    - type: flip_horizontal
      probability: 0.5
model_config:
  model_name: DCGAN
  architecture:
    latent_vector_size: 8
    input_shape: [4, 4]
    generator_hidden: [16]
    discriminator_hidden: [16]
  losses:
    generator: bce
    discriminator: bce
  optimizers:
    generator:
      name: adam
      lr: 0.0005
    discriminator:
      name: adam
      lr: 0.0005
  schedulers:
    generator:
      name: exponential
      gamma: 0.99
  clip_grad: 5.0
  save_eval_images_every_n_epochs: 2
  n_fixed_images_to_generate: 5
  fixed_images_batch_size: 2
";

/// 16 张 4×4 的灰度图像（左右半边亮度不同）及其 CSV 清单
fn write_dataset(dir: &Path) -> std::io::Result<()> {
    let mut csv = String::from("SubjectID,Channel_0\n");
    for i in 0..16u8 {
        let name = format!("sample_{i}.png");
        let image = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 40 + i } else { 200 - i }]));
        image
            .save(dir.join(&name))
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        csv.push_str(&format!("subject_{i},{name}\n"));
    }
    fs::write(dir.join("train.csv"), csv)?;
    fs::write(dir.join("config.yaml"), CONFIG)
}

#[test]
fn test_train_gan_end_to_end() -> Result<(), SynthError> {
    let data_dir = tempfile::tempdir()?;
    let output_dir = tempfile::tempdir()?;
    write_dataset(data_dir.path())?;

    let (global_config, model_config) =
        ConfigManager::new(data_dir.path().join("config.yaml")).prepare_configs()?;
    assert_eq!(model_config.n_dimensions, 2);
    assert!(!model_config.amp);

    let manifest = DataManifest::from_csv_path(data_dir.path().join("train.csv"))?;
    let sources = DataSources::new(manifest)
        .val_ratio(0.25)
        .test_ratio(0.25)
        .base_dir(data_dir.path());
    let mut manager =
        TrainingManager::new(sources, output_dir.path(), global_config, model_config)?;

    let history = manager.run_training()?;
    assert_eq!(history.len(), 3);
    // 测试集 4 条，验证集 floor(12×0.25)=3 条，训练集 9 条 → 3 个训练批次
    for epoch in &history.epochs {
        assert_eq!(epoch.train.batches, 3);
        assert_eq!(epoch.val.as_ref().map(|s| s.batches), Some(1));
        assert_eq!(epoch.test.as_ref().map(|s| s.batches), Some(1));
        assert!(epoch.train.disc_loss.is_finite());
        assert!(epoch.val.as_ref().is_some_and(|s| s.metrics.contains_key("val_psnr")));
    }
    assert_eq!(history.epochs[0].exported_images, Some(5));
    assert_eq!(history.epochs[1].exported_images, None);
    assert_eq!(history.epochs[2].exported_images, Some(5));

    let eval_images = output_dir.path().join("eval_images");
    assert!(eval_images.join("epoch_0").join("fake_image_4.png").is_file());
    assert!(!eval_images.join("epoch_1").exists());
    assert!(eval_images.join("epoch_2").join("fake_image_0.png").is_file());

    let history_json = fs::read_to_string(manager.history_path())?;
    let value: serde_json::Value = serde_json::from_str(&history_json)?;
    assert_eq!(value["epochs"].as_array().map(Vec::len), Some(3));

    let samples = manager.module_mut().inference_step(Some(2))?;
    assert_eq!(samples.shape(), &[2, 1, 4, 4]);
    Ok(())
}

#[test]
fn test_missing_required_key_is_fatal() -> Result<(), SynthError> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.yaml");
    fs::write(&path, "model_config:\n  model_name: dcgan\n")?;
    let result = ConfigManager::new(&path).prepare_configs();
    assert!(matches!(result, Err(SynthError::MissingConfigKey(_))));
    Ok(())
}
