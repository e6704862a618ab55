/*
 * @Date         : 2026-02-07
 * @Description  : 按名称构造损失函数、优化器与学习率调度器
 */

use crate::config::{OptimizerSpec, SchedulerSpec};
use crate::errors::SynthError;
use crate::nn::{
    Adam, BceLoss, BceWithLogitsLoss, ConstantLr, CosineAnnealingLr, ExponentialLr, L1Loss,
    LinearWarmupLr, Loss, LrScheduler, MseLoss, Optimizer, SGD, StepLr,
};

/// 名称统一转成小写，并把`-`视作`_`
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace('-', "_")
}

pub fn get_loss(name: &str) -> Result<Box<dyn Loss>, SynthError> {
    let loss: Box<dyn Loss> = match normalize_name(name).as_str() {
        "bce" | "bceloss" => Box::new(BceLoss),
        "bce_with_logits" | "bcewithlogitsloss" => Box::new(BceWithLogitsLoss),
        "mse" | "mseloss" => Box::new(MseLoss),
        "l1" | "l1loss" => Box::new(L1Loss),
        _ => {
            return Err(SynthError::UnknownComponent {
                kind: "损失函数",
                name: name.to_string(),
            });
        }
    };
    Ok(loss)
}

pub fn get_optimizer(spec: &OptimizerSpec) -> Result<Box<dyn Optimizer>, SynthError> {
    let [beta1, beta2] = spec.betas;
    let optimizer: Box<dyn Optimizer> = match normalize_name(&spec.name).as_str() {
        "sgd" => Box::new(SGD::with_options(
            spec.learning_rate,
            spec.momentum,
            spec.weight_decay,
        )),
        "adam" => Box::new(
            Adam::new(spec.learning_rate, beta1, beta2, spec.eps)
                .with_weight_decay(spec.weight_decay),
        ),
        "adamw" => Box::new(Adam::adamw(
            spec.learning_rate,
            beta1,
            beta2,
            spec.eps,
            spec.weight_decay,
        )),
        _ => {
            return Err(SynthError::UnknownComponent {
                kind: "优化器",
                name: spec.name.clone(),
            });
        }
    };
    Ok(optimizer)
}

/// 构造调度器，并把优化器的学习率同步为调度器第 0 步的学习率
pub fn get_scheduler(
    spec: &SchedulerSpec,
    optimizer: &mut dyn Optimizer,
) -> Result<Box<dyn LrScheduler>, SynthError> {
    let scheduler: Box<dyn LrScheduler> = match normalize_name(&spec.name).as_str() {
        "constant" => Box::new(ConstantLr::new(optimizer)),
        "step" | "steplr" => Box::new(StepLr::new(optimizer, spec.step_size, spec.gamma)),
        "exponential" | "exponentiallr" => Box::new(ExponentialLr::new(optimizer, spec.gamma)),
        "cosine" | "cosineannealinglr" => {
            Box::new(CosineAnnealingLr::new(optimizer, spec.t_max, spec.min_lr))
        }
        "linear_warmup" | "warmup" => Box::new(LinearWarmupLr::new(optimizer, spec.warmup_steps)),
        _ => {
            return Err(SynthError::UnknownComponent {
                kind: "学习率调度器",
                name: spec.name.clone(),
            });
        }
    };
    optimizer.set_learning_rate(scheduler.get_lr());
    Ok(scheduler)
}
