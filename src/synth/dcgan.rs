/*
 * @Date         : 2026-02-07
 * @Description  : 无标注 DCGAN 模块：对抗训练步、验证/测试步、推理以及检查点图像导出
 */

use std::collections::BTreeMap;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::architecture::build_networks;
use super::compute::{StabilityOptions, backward_pass, backward_pass_through};
use super::export::{CheckpointExporter, ExportReport};
use super::latent::LatentSampler;
use super::metrics::{MetricFn, evaluate_metrics};
use super::module::{Player, SkippedUpdate, StepResult, SynthesisModule};
use super::registry::{get_loss, get_optimizer, get_scheduler};
use crate::config::{ModelConfig, NetworkRole, PerNetwork, SchedulerSpec};
use crate::data::Compose;
use crate::errors::SynthError;
use crate::nn::{Loss, LrScheduler, Network, Optimizer, Sequential};
use crate::tensor::Tensor;

/// 需要验证指标驱动的调度器与逐批推进的策略不兼容
pub const UNSUPPORTED_SCHEDULERS: [&str; 4] = [
    "reduceonplateau",
    "plateau",
    "reduce-on-plateau",
    "reduce_on_plateau",
];

const FAMILY: &str = "dcgan";

/// 判别器输出形状为`[N, 1]`，标签与之对应
fn labels(n: usize, value: f32) -> Tensor {
    Tensor::full(&[n, 1], value)
}

pub struct UnlabeledDcganModule {
    model_config: ModelConfig,
    players: PerNetwork<Player>,
    latent: LatentSampler,
    stability: StabilityOptions,
    metrics: BTreeMap<String, MetricFn>,
    postprocessing: Option<Compose>,
    postprocessing_rng: StdRng,
    exporter: CheckpointExporter,
    skipped: Vec<SkippedUpdate>,
}

impl UnlabeledDcganModule {
    pub fn new(
        model_config: ModelConfig,
        output_dir: impl Into<PathBuf>,
        metrics: BTreeMap<String, MetricFn>,
        postprocessing: Option<Compose>,
    ) -> Result<Self, SynthError> {
        let output_dir: PathBuf = output_dir.into();
        let networks = Self::initialize_networks(&model_config);
        let losses = Self::initialize_losses(&model_config)?;
        let mut optimizers = Self::initialize_optimizers(&model_config)?;
        let schedulers = Self::initialize_schedulers(&model_config, &mut optimizers)?;

        let players = PerNetwork::new(
            Player {
                network: networks.generator,
                optimizer: optimizers.generator,
                scheduler: schedulers.generator,
                loss: losses.generator,
            },
            Player {
                network: networks.discriminator,
                optimizer: optimizers.discriminator,
                scheduler: schedulers.discriminator,
                loss: losses.discriminator,
            },
        );
        info!(
            "DCGAN 模块已创建：生成器{}个参数，判别器{}个参数",
            players.generator.network.num_params(),
            players.discriminator.network.num_params()
        );

        Ok(Self {
            latent: LatentSampler::from_config(&model_config),
            stability: StabilityOptions::from_config(&model_config),
            exporter: CheckpointExporter::from_config(&model_config, &output_dir),
            postprocessing_rng: StdRng::seed_from_u64(model_config.init_seed.wrapping_add(2)),
            model_config,
            players,
            metrics,
            postprocessing,
            skipped: Vec::new(),
        })
    }

    pub fn players(&self) -> &PerNetwork<Player> {
        &self.players
    }

    pub fn players_mut(&mut self) -> &mut PerNetwork<Player> {
        &mut self.players
    }

    /// 用固定种子潜向量生成`n`张图像；参数不变时结果完全一致
    pub fn generate_from_fixed_latent(&self, n: usize) -> Result<Tensor, SynthError> {
        self.players.generator.network.infer(&self.latent.fixed(n))
    }

    /// 验证与测试共用：不计算梯度，不修改参数
    fn evaluation_step(
        &mut self,
        batch: &Tensor,
        batch_idx: usize,
        prefix: &str,
    ) -> Result<StepResult, SynthError> {
        let n = batch.batch_size();
        let latent = self.latent.sample(n);
        let PerNetwork {
            generator,
            discriminator: disc,
        } = &self.players;

        let generated = generator.network.infer(&latent)?;
        let preds_real = disc.network.infer(batch)?;
        let preds_fake = disc.network.infer(&generated)?;

        let (ones, zeros) = (labels(n, 1.0), labels(n, 0.0));
        let disc_loss = disc.loss.compute(&preds_real, &ones)?.value
            + disc.loss.compute(&preds_fake, &zeros)?.value;
        let gen_loss = generator.loss.compute(&preds_fake, &ones)?.value;
        let metrics = evaluate_metrics(&self.metrics, batch, &generated, prefix)?;

        debug!("{prefix}批次{batch_idx}：disc_loss={disc_loss:.4}，gen_loss={gen_loss:.4}");
        Ok(StepResult {
            disc_loss,
            gen_loss,
            metrics,
            disc_update: None,
            gen_update: None,
        })
    }

    fn check_scheduler(spec: &SchedulerSpec) -> Result<(), SynthError> {
        let name = spec.name.trim().to_lowercase();
        if UNSUPPORTED_SCHEDULERS.contains(&name.as_str()) {
            return Err(SynthError::UnsupportedScheduler {
                family: FAMILY.to_string(),
                scheduler: spec.name.clone(),
            });
        }
        Ok(())
    }
}

impl SynthesisModule for UnlabeledDcganModule {
    fn training_step(
        &mut self,
        batch: &Tensor,
        batch_idx: usize,
    ) -> Result<StepResult, SynthError> {
        let n = batch.batch_size();
        let policy = self.model_config.scheduler_policy;
        let options = self.stability;
        let PerNetwork {
            generator,
            discriminator: disc,
        } = &mut self.players;

        // 判别器：真实样本
        disc.network.zero_grad();
        let preds_real = disc.network.forward(batch)?;
        let disc_loss_real = disc.loss.compute(&preds_real, &labels(n, 1.0))?;
        backward_pass(&disc_loss_real, &mut disc.network, &options)?;

        // 判别器：生成样本。此处只对判别器反向传播，梯度不会流入生成器
        let latent = self.latent.sample(n);
        let fake = generator.network.forward(&latent)?;
        let preds_fake = disc.network.forward(&fake)?;
        let disc_loss_fake = disc.loss.compute(&preds_fake, &labels(n, 0.0))?;
        backward_pass(&disc_loss_fake, &mut disc.network, &options)?;

        let disc_loss = disc_loss_real.value + disc_loss_fake.value;
        let disc_update = disc.guarded_step(
            NetworkRole::Discriminator,
            disc_loss_real.is_non_finite() || disc_loss_fake.is_non_finite(),
            batch_idx,
            policy,
            &mut self.skipped,
        )?;

        // 生成器：对同一批生成样本重新评分，梯度穿过判别器流入生成器
        generator.network.zero_grad();
        let preds_gen = disc.network.forward(&fake)?;
        let gen_loss = generator.loss.compute(&preds_gen, &labels(n, 1.0))?;
        backward_pass_through(&gen_loss, &mut disc.network, &mut generator.network, &options)?;
        disc.network.zero_grad();
        let gen_update = generator.guarded_step(
            NetworkRole::Generator,
            gen_loss.is_non_finite(),
            batch_idx,
            policy,
            &mut self.skipped,
        )?;

        let metrics = evaluate_metrics(&self.metrics, batch, &fake, "")?;
        debug!(
            "训练批次{batch_idx}：disc_loss={disc_loss:.4}（{disc_update:?}），gen_loss={:.4}（{gen_update:?}）",
            gen_loss.value
        );
        Ok(StepResult {
            disc_loss,
            gen_loss: gen_loss.value,
            metrics,
            disc_update: Some(disc_update),
            gen_update: Some(gen_update),
        })
    }

    fn validation_step(
        &mut self,
        batch: &Tensor,
        batch_idx: usize,
    ) -> Result<StepResult, SynthError> {
        self.evaluation_step(batch, batch_idx, "val_")
    }

    fn test_step(&mut self, batch: &Tensor, batch_idx: usize) -> Result<StepResult, SynthError> {
        self.evaluation_step(batch, batch_idx, "test_")
    }

    fn inference_step(&mut self, n_images: Option<usize>) -> Result<Tensor, SynthError> {
        let fake = self.forward(n_images)?;
        match &self.postprocessing {
            Some(postprocessing) => {
                let samples: Vec<Tensor> = (0..fake.batch_size())
                    .map(|i| postprocessing.apply(&fake.sample(i), &mut self.postprocessing_rng))
                    .collect();
                Tensor::stack(&samples)
            }
            None => Ok(fake),
        }
    }

    fn forward(&mut self, n_images: Option<usize>) -> Result<Tensor, SynthError> {
        let n = match n_images {
            Some(n) if n > 0 => n,
            _ => return Err(SynthError::MissingInferenceCount),
        };
        let latent = self.latent.sample(n);
        self.players.generator.network.infer(&latent)
    }

    fn on_train_epoch_end(&mut self, epoch: usize) -> Result<Option<ExportReport>, SynthError> {
        if !self.exporter.is_due(epoch) {
            return Ok(None);
        }
        let fixed_latent = self.latent.fixed(self.exporter.total());
        self.exporter
            .export(epoch, &self.players.generator.network, &fixed_latent)
            .map(Some)
    }

    fn model_config(&self) -> &ModelConfig {
        &self.model_config
    }

    fn skipped_updates(&self) -> &[SkippedUpdate] {
        &self.skipped
    }

    fn initialize_networks(config: &ModelConfig) -> PerNetwork<Sequential> {
        let (generator, discriminator) = build_networks(config);
        PerNetwork::new(generator, discriminator)
    }

    fn initialize_losses(config: &ModelConfig) -> Result<PerNetwork<Box<dyn Loss>>, SynthError> {
        Ok(PerNetwork::new(
            get_loss(&config.losses.generator)?,
            get_loss(&config.losses.discriminator)?,
        ))
    }

    fn initialize_optimizers(
        config: &ModelConfig,
    ) -> Result<PerNetwork<Box<dyn Optimizer>>, SynthError> {
        Ok(PerNetwork::new(
            get_optimizer(&config.optimizers.generator)?,
            get_optimizer(&config.optimizers.discriminator)?,
        ))
    }

    fn initialize_schedulers(
        config: &ModelConfig,
        optimizers: &mut PerNetwork<Box<dyn Optimizer>>,
    ) -> Result<PerNetwork<Option<Box<dyn LrScheduler>>>, SynthError> {
        let mut schedulers = PerNetwork::new(None, None);
        let Some(specs) = &config.schedulers else {
            return Ok(schedulers);
        };
        for (role, spec) in [
            (NetworkRole::Generator, &specs.generator),
            (NetworkRole::Discriminator, &specs.discriminator),
        ] {
            if let Some(spec) = spec {
                Self::check_scheduler(spec)?;
                let scheduler = get_scheduler(spec, optimizers.get_mut(role).as_mut())?;
                *schedulers.get_mut(role) = Some(scheduler);
            }
        }
        Ok(schedulers)
    }
}
