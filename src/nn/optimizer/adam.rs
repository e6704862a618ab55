/*
 * @Date         : 2026-02-03
 * @Description  : Adam / AdamW 优化器实现
 */

use super::{Optimizer, SlotState};
use crate::errors::SynthError;
use crate::nn::Network;

/// Adam优化器
///
/// `decoupled_weight_decay`为真时即 AdamW：权重衰减直接作用于参数，
/// 而不是加到梯度上。
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    weight_decay: f32,
    decoupled_weight_decay: bool,
    /// 一阶矩估计
    m: SlotState,
    /// 二阶矩估计
    v: SlotState,
    /// 时间步
    t: usize,
}

impl Adam {
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            weight_decay: 0.0,
            decoupled_weight_decay: false,
            m: SlotState::default(),
            v: SlotState::default(),
            t: 0,
        }
    }

    /// 使用默认参数（β1=0.9, β2=0.999, ε=1e-8）创建Adam优化器
    pub fn new_default(learning_rate: f32) -> Self {
        Self::new(learning_rate, 0.9, 0.999, 1e-8)
    }

    /// AdamW：解耦的权重衰减
    pub fn adamw(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32, weight_decay: f32) -> Self {
        Self {
            weight_decay,
            decoupled_weight_decay: true,
            ..Self::new(learning_rate, beta1, beta2, epsilon)
        }
    }

    /// 经典 L2 形式的权重衰减（加到梯度上）
    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }
}

impl Optimizer for Adam {
    fn name(&self) -> &str {
        if self.decoupled_weight_decay { "adamw" } else { "adam" }
    }

    fn step(&mut self, network: &mut dyn Network) -> Result<(), SynthError> {
        self.m.ensure(network)?;
        self.v.ensure(network)?;
        self.t += 1;

        let bias_correction1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias_correction2 = 1.0 - self.beta2.powi(self.t as i32);

        for (i, param) in network.parameters_mut().into_iter().enumerate() {
            let (value, grad) = param.value_and_grad_mut();
            let mut gradient = grad.clone();
            if self.weight_decay != 0.0 {
                if self.decoupled_weight_decay {
                    *value *= 1.0 - self.learning_rate * self.weight_decay;
                } else {
                    gradient.scaled_add(self.weight_decay, &*value);
                }
            }

            // m = β1·m + (1-β1)·g
            let m = self.m.get_mut(i);
            *m *= self.beta1;
            m.scaled_add(1.0 - self.beta1, &gradient);
            let m_hat = &*m / bias_correction1;

            // v = β2·v + (1-β2)·g²
            let v = self.v.get_mut(i);
            *v *= self.beta2;
            v.scaled_add(1.0 - self.beta2, &gradient.mapv(|g| g * g));
            let v_hat = &*v / bias_correction2;

            let eps = self.epsilon;
            let update = m_hat / v_hat.mapv(|x| x.sqrt() + eps);
            value.scaled_add(-self.learning_rate, &update);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }

    fn steps_taken(&self) -> usize {
        self.t
    }
}
