/*
 * @Date         : 2026-02-03
 * @Description  : 优化器。生成器与判别器各自持有独立的优化器实例，
 *                 优化器只更新传入网络的参数。
 */

mod adam;
mod sgd;

pub use adam::Adam;
pub use sgd::SGD;

use ndarray::Array2;

use super::Network;
use crate::errors::SynthError;

/// 优化器核心 trait
pub trait Optimizer {
    fn name(&self) -> &str;

    /// 参数更新（使用已累积的梯度）
    ///
    /// 训练循环：
    /// ```ignore
    /// network.zero_grad();
    /// let output = network.forward(&input)?;
    /// let loss = criterion.compute(&output, &target)?;
    /// network.backward(&loss.grad)?;
    /// optimizer.step(&mut network)?; // ← 只更新参数，不做 forward/backward
    /// ```
    fn step(&mut self, network: &mut dyn Network) -> Result<(), SynthError>;

    /// 重置累积状态（动量、矩估计、步数）
    fn reset(&mut self);

    fn learning_rate(&self) -> f32;

    fn set_learning_rate(&mut self, lr: f32);

    /// 已执行的`step`次数
    fn steps_taken(&self) -> usize;
}

/// 按参数顺序保存的逐参数状态（动量或矩估计）
///
/// 首次`step`时按网络参数的形状懒初始化；此后参数个数或形状变化视为错误。
#[derive(Debug, Clone, Default)]
pub(crate) struct SlotState {
    slots: Vec<Array2<f32>>,
}

impl SlotState {
    pub(crate) fn ensure(&mut self, network: &dyn Network) -> Result<(), SynthError> {
        let params = network.parameters();
        if self.slots.is_empty() {
            self.slots = params
                .iter()
                .map(|p| Array2::zeros(p.value().raw_dim()))
                .collect();
            return Ok(());
        }
        let expected: Vec<usize> = self.slots.iter().map(|s| s.len()).collect();
        let got: Vec<usize> = params.iter().map(|p| p.size()).collect();
        if expected != got {
            return Err(SynthError::ShapeMismatch {
                context: format!("优化器状态与网络`{}`的参数", network.name()),
                expected,
                got,
            });
        }
        Ok(())
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Array2<f32> {
        &mut self.slots[index]
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
