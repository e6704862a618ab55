/*
 * @Date         : 2026-02-03
 * @Description  : 损失函数（criterion）。所有损失都对批内全部元素取均值，
 *                 并同时给出损失值及其对预测值的梯度。
 */

use crate::errors::SynthError;
use crate::tensor::Tensor;

/// PyTorch 的 BCELoss 把 log 截断在 -100，避免 log(0) 得到无穷大
const LOG_FLOOR: f32 = -100.0;
const EPSILON: f32 = 1e-12;

/// 一次损失计算的结果
#[derive(Debug, Clone)]
pub struct LossOutput {
    pub value: f32,
    /// 损失对预测值的梯度，形状与预测值一致
    pub grad: Tensor,
}

impl LossOutput {
    /// NaN 或正负无穷
    pub fn is_non_finite(&self) -> bool {
        !self.value.is_finite()
    }
}

pub trait Loss {
    fn name(&self) -> &str;
    fn compute(&self, prediction: &Tensor, target: &Tensor) -> Result<LossOutput, SynthError>;
}

/// 二元交叉熵，输入须为概率（即已过 Sigmoid）
#[derive(Debug, Clone, Default)]
pub struct BceLoss;

/// 带 Sigmoid 的二元交叉熵，输入为 logits
#[derive(Debug, Clone, Default)]
pub struct BceWithLogitsLoss;

#[derive(Debug, Clone, Default)]
pub struct MseLoss;

#[derive(Debug, Clone, Default)]
pub struct L1Loss;

impl Loss for BceLoss {
    fn name(&self) -> &str {
        "bce"
    }

    fn compute(&self, prediction: &Tensor, target: &Tensor) -> Result<LossOutput, SynthError> {
        elementwise(prediction, target, |p, t| {
            let log_p = floor_nan_safe(p.ln(), LOG_FLOOR);
            let log_1mp = floor_nan_safe((1.0 - p).ln(), LOG_FLOOR);
            let loss = -(t * log_p + (1.0 - t) * log_1mp);
            let grad = (p - t) / floor_nan_safe(p * (1.0 - p), EPSILON);
            (loss, grad)
        })
    }
}

impl Loss for BceWithLogitsLoss {
    fn name(&self) -> &str {
        "bce_with_logits"
    }

    fn compute(&self, prediction: &Tensor, target: &Tensor) -> Result<LossOutput, SynthError> {
        elementwise(prediction, target, |x, t| {
            // max(x, 0) - x*t + log(1 + e^-|x|)，数值稳定写法
            let positive_part = if x > 0.0 { x } else { 0.0 * x };
            let loss = positive_part - x * t + (-x.abs()).exp().ln_1p();
            let sigmoid = 1.0 / (1.0 + (-x).exp());
            (loss, sigmoid - t)
        })
    }
}

impl Loss for MseLoss {
    fn name(&self) -> &str {
        "mse"
    }

    fn compute(&self, prediction: &Tensor, target: &Tensor) -> Result<LossOutput, SynthError> {
        elementwise(prediction, target, |p, t| {
            let diff = p - t;
            (diff * diff, 2.0 * diff)
        })
    }
}

impl Loss for L1Loss {
    fn name(&self) -> &str {
        "l1"
    }

    fn compute(&self, prediction: &Tensor, target: &Tensor) -> Result<LossOutput, SynthError> {
        elementwise(prediction, target, |p, t| {
            let diff = p - t;
            let sign = if diff > 0.0 {
                1.0
            } else if diff < 0.0 {
                -1.0
            } else {
                0.0
            };
            (diff.abs(), sign)
        })
    }
}

/// 逐元素计算损失与梯度，再对全部元素取均值
fn elementwise(
    prediction: &Tensor,
    target: &Tensor,
    f: impl Fn(f32, f32) -> (f32, f32),
) -> Result<LossOutput, SynthError> {
    if prediction.shape() != target.shape() {
        return Err(SynthError::ShapeMismatch {
            context: "损失函数的预测值与目标值".to_string(),
            expected: prediction.shape().to_vec(),
            got: target.shape().to_vec(),
        });
    }
    let n = prediction.size().max(1) as f32;
    let mut total = 0.0;
    let mut grads = Vec::with_capacity(prediction.size());
    for (&p, &t) in prediction.data().iter().zip(target.data().iter()) {
        let (loss, grad) = f(p, t);
        total += loss;
        grads.push(grad / n);
    }
    Ok(LossOutput {
        value: total / n,
        grad: Tensor::new(&grads, prediction.shape()),
    })
}

/// 下界截断，但保留 NaN（`f32::max`会把 NaN 吞掉）
fn floor_nan_safe(x: f32, floor: f32) -> f32 {
    if x < floor { floor } else { x }
}
