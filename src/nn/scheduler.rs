/*
 * @Date         : 2026-02-03
 * @Description  : 学习率调度器。调度器在构造时记下优化器的初始学习率，
 *                 每次`step`推进一步并把新学习率写回优化器。
 */

use std::f32::consts::PI;

use super::Optimizer;

/// 学习率调度器 trait
pub trait LrScheduler {
    fn name(&self) -> &str;

    /// 第`step`步（从0开始）对应的学习率
    fn lr_at(&self, step: usize) -> f32;

    /// 已推进的步数
    fn steps_taken(&self) -> usize;

    /// 推进计数器（不触碰优化器）
    fn advance(&mut self);

    /// 当前学习率
    fn get_lr(&self) -> f32 {
        self.lr_at(self.steps_taken())
    }

    /// 推进一步并把新学习率应用到优化器
    fn step(&mut self, optimizer: &mut dyn Optimizer) {
        self.advance();
        optimizer.set_learning_rate(self.get_lr());
    }
}

/// 为每个调度器生成计数相关的样板实现
macro_rules! step_counter {
    () => {
        fn steps_taken(&self) -> usize {
            self.current_step
        }

        fn advance(&mut self) {
            self.current_step += 1;
        }
    };
}

/// 恒定学习率
#[derive(Debug, Clone)]
pub struct ConstantLr {
    base_lr: f32,
    current_step: usize,
}

impl ConstantLr {
    pub fn new(optimizer: &dyn Optimizer) -> Self {
        Self {
            base_lr: optimizer.learning_rate(),
            current_step: 0,
        }
    }
}

impl LrScheduler for ConstantLr {
    fn name(&self) -> &str {
        "constant"
    }

    fn lr_at(&self, _step: usize) -> f32 {
        self.base_lr
    }

    step_counter!();
}

/// 阶梯衰减：每`step_size`步乘以`gamma`
#[derive(Debug, Clone)]
pub struct StepLr {
    base_lr: f32,
    step_size: usize,
    gamma: f32,
    current_step: usize,
}

impl StepLr {
    pub fn new(optimizer: &dyn Optimizer, step_size: usize, gamma: f32) -> Self {
        Self {
            base_lr: optimizer.learning_rate(),
            step_size: step_size.max(1),
            gamma,
            current_step: 0,
        }
    }
}

impl LrScheduler for StepLr {
    fn name(&self) -> &str {
        "step"
    }

    fn lr_at(&self, step: usize) -> f32 {
        self.base_lr * self.gamma.powi((step / self.step_size) as i32)
    }

    step_counter!();
}

/// 指数衰减：lr_t = lr_0 · γ^t
#[derive(Debug, Clone)]
pub struct ExponentialLr {
    base_lr: f32,
    gamma: f32,
    current_step: usize,
}

impl ExponentialLr {
    pub fn new(optimizer: &dyn Optimizer, gamma: f32) -> Self {
        Self {
            base_lr: optimizer.learning_rate(),
            gamma,
            current_step: 0,
        }
    }
}

impl LrScheduler for ExponentialLr {
    fn name(&self) -> &str {
        "exponential"
    }

    fn lr_at(&self, step: usize) -> f32 {
        self.base_lr * self.gamma.powi(step as i32)
    }

    step_counter!();
}

/// 余弦退火
///
/// lr_t = lr_min + 0.5 · (lr_max - lr_min) · (1 + cos(π · t / T))，t ≥ T 后保持 lr_min
#[derive(Debug, Clone)]
pub struct CosineAnnealingLr {
    base_lr: f32,
    min_lr: f32,
    t_max: usize,
    current_step: usize,
}

impl CosineAnnealingLr {
    pub fn new(optimizer: &dyn Optimizer, t_max: usize, min_lr: f32) -> Self {
        Self {
            base_lr: optimizer.learning_rate(),
            min_lr,
            t_max: t_max.max(1),
            current_step: 0,
        }
    }
}

impl LrScheduler for CosineAnnealingLr {
    fn name(&self) -> &str {
        "cosine"
    }

    fn lr_at(&self, step: usize) -> f32 {
        if step >= self.t_max {
            return self.min_lr;
        }
        let progress = step as f32 / self.t_max as f32;
        self.min_lr + 0.5 * (self.base_lr - self.min_lr) * (1.0 + (PI * progress).cos())
    }

    step_counter!();
}

/// 线性预热：前`warmup_steps`步从`base_lr / warmup_steps`线性升到`base_lr`，之后保持不变
#[derive(Debug, Clone)]
pub struct LinearWarmupLr {
    base_lr: f32,
    warmup_steps: usize,
    current_step: usize,
}

impl LinearWarmupLr {
    pub fn new(optimizer: &dyn Optimizer, warmup_steps: usize) -> Self {
        Self {
            base_lr: optimizer.learning_rate(),
            warmup_steps,
            current_step: 0,
        }
    }
}

impl LrScheduler for LinearWarmupLr {
    fn name(&self) -> &str {
        "linear_warmup"
    }

    fn lr_at(&self, step: usize) -> f32 {
        if step >= self.warmup_steps {
            return self.base_lr;
        }
        self.base_lr * (step + 1) as f32 / self.warmup_steps as f32
    }

    step_counter!();
}
