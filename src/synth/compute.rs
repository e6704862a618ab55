/*
 * @Date         : 2026-02-07
 * @Description  : 梯度步执行器：反向传播 + 可选的混合精度缩放与梯度裁剪。
 *                 只负责把梯度准备好，是否调用优化器由调用方（NaN 守卫）决定。
 */

use ndarray::Array2;

use crate::config::{ClipMode, ModelConfig};
use crate::errors::SynthError;
use crate::nn::{LossOutput, Network};
use crate::tensor::Tensor;

/// 开启`amp`时的静态损失缩放系数
pub const AMP_LOSS_SCALE: f32 = 1024.0;

/// 数值稳定相关选项
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StabilityOptions {
    pub amp: bool,
    pub clip_grad: Option<f32>,
    pub clip_mode: ClipMode,
}

impl StabilityOptions {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            amp: config.amp,
            clip_grad: config.clip_grad,
            clip_mode: config.clip_mode,
        }
    }
}

/// 对`network`自身的输出做反向传播
pub fn backward_pass(
    loss: &LossOutput,
    network: &mut dyn Network,
    options: &StabilityOptions,
) -> Result<(), SynthError> {
    let before = grads_before(network, options);
    network.backward(&scaled_grad(loss, options))?;
    finish_gradients(network, before, options);
    Ok(())
}

/// 损失定义在`critic`的输出上，梯度穿过`critic`流入`network`
///
/// `critic`的参数梯度同样会被累加，调用方负责在之后将其清零。
pub fn backward_pass_through(
    loss: &LossOutput,
    critic: &mut dyn Network,
    network: &mut dyn Network,
    options: &StabilityOptions,
) -> Result<(), SynthError> {
    let before = grads_before(network, options);
    let grad_input = critic.backward(&scaled_grad(loss, options))?;
    network.backward(&grad_input)?;
    finish_gradients(network, before, options);
    Ok(())
}

fn scaled_grad(loss: &LossOutput, options: &StabilityOptions) -> Tensor {
    if options.amp {
        loss.grad.scaled(AMP_LOSS_SCALE)
    } else {
        loss.grad.clone()
    }
}

/// 开启 amp 时记下反向传播前已累积的梯度，反缩放只作用于本次新增的部分
fn grads_before(network: &dyn Network, options: &StabilityOptions) -> Option<Vec<Array2<f32>>> {
    options
        .amp
        .then(|| network.parameters().iter().map(|p| p.grad().clone()).collect())
}

/// 反缩放（若开启 amp）后再裁剪
fn finish_gradients(
    network: &mut dyn Network,
    before: Option<Vec<Array2<f32>>>,
    options: &StabilityOptions,
) {
    if let Some(before) = before {
        for (param, previous) in network.parameters_mut().into_iter().zip(before) {
            let grad = param.grad_mut();
            *grad -= &previous;
            *grad /= AMP_LOSS_SCALE;
            *grad += &previous;
        }
    }
    if let Some(threshold) = options.clip_grad {
        match options.clip_mode {
            ClipMode::Norm => {
                clip_grad_norm(network, threshold);
            }
            ClipMode::Value => clip_grad_value(network, threshold),
        }
    }
}

/// 按全局范数裁剪梯度
///
/// global_norm = sqrt(所有梯度元素的平方和)；若超过`max_norm`，
/// 所有梯度乘以 max_norm / global_norm。返回裁剪前的全局范数。
pub fn clip_grad_norm(network: &mut dyn Network, max_norm: f32) -> f32 {
    let global_norm = network
        .parameters()
        .iter()
        .map(|p| p.grad().iter().map(|&g| g * g).sum::<f32>())
        .sum::<f32>()
        .sqrt();

    if global_norm > max_norm {
        let clip_coef = max_norm / global_norm;
        for param in network.parameters_mut() {
            *param.grad_mut() *= clip_coef;
        }
    }
    global_norm
}

/// 把每个梯度元素截断到[-clip_value, clip_value]（NaN 保持不变）
pub fn clip_grad_value(network: &mut dyn Network, clip_value: f32) {
    for param in network.parameters_mut() {
        param.grad_mut().mapv_inplace(|g| {
            if g > clip_value {
                clip_value
            } else if g < -clip_value {
                -clip_value
            } else {
                g
            }
        });
    }
}
