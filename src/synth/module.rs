/*
 * @Date         : 2026-02-07
 * @Description  : 合成模块的公共协议（训练/评估/推理步 + 各组件初始化），
 *                 以及按模型族构造模块的工厂
 */

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use super::export::ExportReport;
use super::metrics::MetricFn;
use super::UnlabeledDcganModule;
use crate::config::{
    LabelingParadigm, ModelConfig, ModelFamily, NetworkRole, PerNetwork, SchedulerPolicy,
};
use crate::data::Compose;
use crate::errors::SynthError;
use crate::nn::{Loss, LrScheduler, Network, Optimizer, Sequential};
use crate::tensor::Tensor;

/// 一次优化器更新的结果：真正更新，或因 NaN 损失被跳过，二者互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Stepped,
    Skipped,
}

/// 被 NaN 守卫跳过的一次更新
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedUpdate {
    pub batch_idx: usize,
    pub role: NetworkRole,
}

/// 单步的输出
///
/// 评估步不更新参数，`disc_update`与`gen_update`都为`None`。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepResult {
    pub disc_loss: f32,
    pub gen_loss: f32,
    pub metrics: BTreeMap<String, f32>,
    pub disc_update: Option<UpdateOutcome>,
    pub gen_update: Option<UpdateOutcome>,
}

/// 对抗中的一方：网络及其专属的优化器、调度器和损失
pub struct Player {
    pub network: Sequential,
    pub optimizer: Box<dyn Optimizer>,
    pub scheduler: Option<Box<dyn LrScheduler>>,
    pub loss: Box<dyn Loss>,
}

impl Player {
    /// NaN 守卫：损失不是有限数（NaN 或无穷）时跳过优化器更新（参数保持不变）并记录，否则更新并清零梯度。
    /// 随后按`policy`推进调度器。
    pub fn guarded_step(
        &mut self,
        role: NetworkRole,
        loss_is_non_finite: bool,
        batch_idx: usize,
        policy: SchedulerPolicy,
        skipped: &mut Vec<SkippedUpdate>,
    ) -> Result<UpdateOutcome, SynthError> {
        let outcome = if loss_is_non_finite {
            warn!("批次{batch_idx}中{role}的损失不是有限数，跳过本次优化器更新");
            skipped.push(SkippedUpdate { batch_idx, role });
            UpdateOutcome::Skipped
        } else {
            self.optimizer.step(&mut self.network)?;
            self.network.zero_grad();
            UpdateOutcome::Stepped
        };

        if let Some(scheduler) = self.scheduler.as_mut() {
            let advance = match policy {
                SchedulerPolicy::EveryBatch => true,
                SchedulerPolicy::AfterUpdate => outcome == UpdateOutcome::Stepped,
            };
            if advance {
                scheduler.step(self.optimizer.as_mut());
            }
        }
        Ok(outcome)
    }
}

/// 合成模块协议
///
/// 一个模型族（及其标注范式）对应一个实现。训练管理器只通过本 trait 驱动模块。
pub trait SynthesisModule {
    /// 一个训练批次：先判别器、后生成器
    fn training_step(&mut self, batch: &Tensor, batch_idx: usize)
    -> Result<StepResult, SynthError>;

    /// 验证批次，指标以`val_`为前缀
    fn validation_step(
        &mut self,
        batch: &Tensor,
        batch_idx: usize,
    ) -> Result<StepResult, SynthError>;

    /// 测试批次，指标以`test_`为前缀
    fn test_step(&mut self, batch: &Tensor, batch_idx: usize) -> Result<StepResult, SynthError>;

    /// 生成`n_images`张图像并执行后处理
    fn inference_step(&mut self, n_images: Option<usize>) -> Result<Tensor, SynthError>;

    /// 仅调用生成器
    fn forward(&mut self, n_images: Option<usize>) -> Result<Tensor, SynthError>;

    /// 每个训练 epoch 结束时调用；按配置的间隔导出检查点图像
    fn on_train_epoch_end(&mut self, epoch: usize) -> Result<Option<ExportReport>, SynthError>;

    fn model_config(&self) -> &ModelConfig;

    /// 迄今为止被 NaN 守卫跳过的所有更新
    fn skipped_updates(&self) -> &[SkippedUpdate];

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓组件初始化↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    fn initialize_networks(config: &ModelConfig) -> PerNetwork<Sequential>
    where
        Self: Sized;

    fn initialize_losses(config: &ModelConfig) -> Result<PerNetwork<Box<dyn Loss>>, SynthError>
    where
        Self: Sized;

    fn initialize_optimizers(
        config: &ModelConfig,
    ) -> Result<PerNetwork<Box<dyn Optimizer>>, SynthError>
    where
        Self: Sized;

    fn initialize_schedulers(
        config: &ModelConfig,
        optimizers: &mut PerNetwork<Box<dyn Optimizer>>,
    ) -> Result<PerNetwork<Option<Box<dyn LrScheduler>>>, SynthError>
    where
        Self: Sized;
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑组件初始化↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

/// 按模型族与标注范式构造合成模块
pub struct ModuleFactory {
    model_config: ModelConfig,
    output_dir: PathBuf,
    metrics: BTreeMap<String, MetricFn>,
    postprocessing: Option<Compose>,
}

impl ModuleFactory {
    pub fn new(
        model_config: ModelConfig,
        output_dir: impl Into<PathBuf>,
        metrics: BTreeMap<String, MetricFn>,
        postprocessing: Option<Compose>,
    ) -> Self {
        Self {
            model_config,
            output_dir: output_dir.into(),
            metrics,
            postprocessing,
        }
    }

    pub fn get_module(self) -> Result<Box<dyn SynthesisModule>, SynthError> {
        let family = self.model_config.model_family()?;
        match (family, self.model_config.labeling_paradigm) {
            (ModelFamily::Dcgan, LabelingParadigm::Unlabeled) => {
                Ok(Box::new(UnlabeledDcganModule::new(
                    self.model_config,
                    self.output_dir,
                    self.metrics,
                    self.postprocessing,
                )?))
            }
            (family, paradigm) => Err(SynthError::UnsupportedLabeling {
                family: family.to_string(),
                paradigm: paradigm.to_string(),
            }),
        }
    }
}
