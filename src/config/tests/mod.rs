mod defaults;

/// 只包含必需参数的最小配置
pub(super) const MINIMAL_CONFIG: &str = "
num_epochs: 3
model_config:
  model_name: dcgan
  architecture:
    latent_vector_size: 8
    input_shape: [4, 4]
  losses:
    generator: bce
    discriminator: bce
  optimizers:
    generator:
      name: adam
      lr: 0.001
    discriminator:
      name: sgd
";
