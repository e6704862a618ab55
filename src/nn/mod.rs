/*
 * @Date         : 2026-02-03
 * @Description  : 负责可训练网络（neural network）的构建：参数、层、网络、损失、优化器与学习率调度器。
 *                 前向时各层缓存反向所需的中间值，反向时显式地逐层回传梯度，
 *                 因此“梯度流向哪个网络”完全由调用方决定（见`synth::compute`）。
 */

mod criterion;
pub mod layer;
mod module;
pub mod optimizer;
mod parameter;
pub mod scheduler;
mod sequential;

pub use criterion::{BceLoss, BceWithLogitsLoss, L1Loss, Loss, LossOutput, MseLoss};
pub use layer::{Layer, LayerEnum, LeakyRelu, Linear, Relu, Sigmoid, Tanh};
pub use module::Network;
pub use optimizer::{Adam, Optimizer, SGD};
pub use parameter::Parameter;
pub use scheduler::{
    ConstantLr, CosineAnnealingLr, ExponentialLr, LinearWarmupLr, LrScheduler, StepLr,
};
pub use sequential::Sequential;

#[cfg(test)]
mod tests;
