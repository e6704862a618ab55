/*
 * @Date         : 2026-02-07
 * @Description  : GAN 的全连接生成器与判别器
 */

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ModelConfig, OutputActivation};
use crate::nn::{LeakyRelu, Linear, Sequential, Sigmoid, Tanh};

/// 生成器与判别器共用一条由`init_seed`派生的随机流，保证权重可复现
pub fn build_networks(config: &ModelConfig) -> (Sequential, Sequential) {
    let mut rng = StdRng::seed_from_u64(config.init_seed);
    let generator = build_generator(config, &mut rng);
    let discriminator = build_discriminator(config, &mut rng);
    (generator, discriminator)
}

/// latent → hidden…（LeakyReLU）→ C×空间维度（Sigmoid 或 Tanh）
pub fn build_generator(config: &ModelConfig, rng: &mut StdRng) -> Sequential {
    let arch = &config.architecture;
    let sample_shape = config.sample_shape();
    let out_features: usize = sample_shape.iter().product();

    let mut net = Sequential::new("generator", &sample_shape);
    let mut in_features = arch.latent_vector_size;
    for (i, &hidden) in arch.generator_hidden.iter().enumerate() {
        net = net
            .add(Linear::new_seeded(in_features, hidden, &format!("g_fc{}", i + 1), rng))
            .add(LeakyRelu::new(arch.leaky_relu_slope));
        in_features = hidden;
    }
    net = net.add(Linear::new_seeded(in_features, out_features, "g_out", rng));
    match arch.generator_output {
        OutputActivation::Sigmoid => net.add(Sigmoid::new()),
        OutputActivation::Tanh => net.add(Tanh::new()),
    }
}

/// C×空间维度 → hidden…（LeakyReLU）→ 1
///
/// 判别器损失为`bce_with_logits`时输出 logits，否则输出概率。
pub fn build_discriminator(config: &ModelConfig, rng: &mut StdRng) -> Sequential {
    let arch = &config.architecture;
    let in_total: usize = config.sample_shape().iter().product();

    let mut net = Sequential::new("discriminator", &[1]);
    let mut in_features = in_total;
    for (i, &hidden) in arch.discriminator_hidden.iter().enumerate() {
        net = net
            .add(Linear::new_seeded(in_features, hidden, &format!("d_fc{}", i + 1), rng))
            .add(LeakyRelu::new(arch.leaky_relu_slope));
        in_features = hidden;
    }
    net = net.add(Linear::new_seeded(in_features, 1, "d_out", rng));
    if outputs_logits(config) {
        net
    } else {
        net.add(Sigmoid::new())
    }
}

fn outputs_logits(config: &ModelConfig) -> bool {
    let name = config.losses.discriminator.trim().to_lowercase().replace('-', "_");
    name == "bce_with_logits" || name == "bcewithlogitsloss"
}
