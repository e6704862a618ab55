//! 对抗生成的核心
//!
//! - [`LatentSampler`]: 随机 / 固定种子潜向量
//! - [`compute`]: 梯度步执行器（反向传播、amp 缩放、梯度裁剪）
//! - [`registry`]: 按名称构造损失、优化器、调度器
//! - [`metrics`]: 指标注册表
//! - [`SynthesisModule`] / [`ModuleFactory`]: 模块协议与工厂
//! - [`UnlabeledDcganModule`]: 无标注 DCGAN
//! - [`CheckpointExporter`]: 检查点图像导出

mod architecture;
pub mod compute;
mod dcgan;
mod export;
mod latent;
pub mod metrics;
mod module;
pub mod registry;

#[cfg(test)]
mod tests;

pub use architecture::{build_discriminator, build_generator, build_networks};
pub use compute::{AMP_LOSS_SCALE, StabilityOptions, backward_pass, backward_pass_through};
pub use dcgan::{UNSUPPORTED_SCHEDULERS, UnlabeledDcganModule};
pub use export::{CheckpointExporter, ExportReport, export_batch_sizes, should_export};
pub use latent::LatentSampler;
pub use metrics::{MetricFn, get_metrics};
pub use module::{
    ModuleFactory, Player, SkippedUpdate, StepResult, SynthesisModule, UpdateOutcome,
};
