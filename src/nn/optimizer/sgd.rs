/*
 * @Date         : 2026-02-03
 * @Description  : SGD优化器（可选动量与 L2 权重衰减）
 */

use super::{Optimizer, SlotState};
use crate::errors::SynthError;
use crate::nn::Network;

/// 随机梯度下降
///
/// v ← μ·v + (g + λ·θ)，θ ← θ - lr·v；μ=0 时即为朴素 SGD。
#[derive(Debug, Clone)]
pub struct SGD {
    learning_rate: f32,
    momentum: f32,
    weight_decay: f32,
    velocity: SlotState,
    steps: usize,
}

impl SGD {
    pub fn new(learning_rate: f32) -> Self {
        Self::with_options(learning_rate, 0.0, 0.0)
    }

    pub fn with_options(learning_rate: f32, momentum: f32, weight_decay: f32) -> Self {
        Self {
            learning_rate,
            momentum,
            weight_decay,
            velocity: SlotState::default(),
            steps: 0,
        }
    }
}

impl Optimizer for SGD {
    fn name(&self) -> &str {
        "sgd"
    }

    fn step(&mut self, network: &mut dyn Network) -> Result<(), SynthError> {
        if self.momentum != 0.0 {
            self.velocity.ensure(network)?;
        }
        for (i, param) in network.parameters_mut().into_iter().enumerate() {
            let (value, grad) = param.value_and_grad_mut();
            let mut update = grad.clone();
            if self.weight_decay != 0.0 {
                update.scaled_add(self.weight_decay, &*value);
            }
            if self.momentum != 0.0 {
                let velocity = self.velocity.get_mut(i);
                *velocity *= self.momentum;
                *velocity += &update;
                update.assign(&*velocity);
            }
            value.scaled_add(-self.learning_rate, &update);
        }
        self.steps += 1;
        Ok(())
    }

    fn reset(&mut self) {
        self.velocity.clear();
        self.steps = 0;
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }

    fn steps_taken(&self) -> usize {
        self.steps
    }
}
