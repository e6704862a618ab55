/*
 * @Date         : 2026-02-07
 * @Description  : 指标注册表。每个指标以(参考批次, 生成批次)为输入，返回一个标量。
 */

use std::collections::BTreeMap;

use crate::errors::SynthError;
use crate::tensor::Tensor;

pub type MetricFn = fn(&Tensor, &Tensor) -> Result<f32, SynthError>;

/// PSNR 与 SSIM 假定像素取值范围为[0, 1]
const DATA_RANGE: f32 = 1.0;
const SSIM_K1: f32 = 0.01;
const SSIM_K2: f32 = 0.03;

/// 按名称取得指标函数；名称未注册时报错
pub fn get_metrics(names: &[String]) -> Result<BTreeMap<String, MetricFn>, SynthError> {
    let mut metrics = BTreeMap::new();
    for name in names {
        let key = name.trim().to_lowercase();
        let metric: MetricFn = match key.as_str() {
            "mse" => mse,
            "mae" | "l1" => mae,
            "psnr" => psnr,
            "ncc" => ncc,
            "ssim" => ssim,
            _ => {
                return Err(SynthError::UnknownComponent {
                    kind: "指标",
                    name: name.clone(),
                });
            }
        };
        metrics.insert(key, metric);
    }
    Ok(metrics)
}

/// 对全部指标求值，键名加上`prefix`（如`val_`）
pub fn evaluate_metrics(
    metrics: &BTreeMap<String, MetricFn>,
    reference: &Tensor,
    generated: &Tensor,
    prefix: &str,
) -> Result<BTreeMap<String, f32>, SynthError> {
    metrics
        .iter()
        .map(|(name, metric)| Ok((format!("{prefix}{name}"), metric(reference, generated)?)))
        .collect()
}

fn check_shapes(reference: &Tensor, generated: &Tensor) -> Result<(), SynthError> {
    if reference.shape() != generated.shape() {
        return Err(SynthError::ShapeMismatch {
            context: "指标计算".to_string(),
            expected: reference.shape().to_vec(),
            got: generated.shape().to_vec(),
        });
    }
    Ok(())
}

/// 逐元素差值的均值统计
fn mean_of(reference: &Tensor, generated: &Tensor, f: impl Fn(f32) -> f32) -> Result<f32, SynthError> {
    check_shapes(reference, generated)?;
    let n = reference.size().max(1) as f32;
    let total: f32 = reference
        .data()
        .iter()
        .zip(generated.data().iter())
        .map(|(&a, &b)| f(a - b))
        .sum();
    Ok(total / n)
}

pub fn mse(reference: &Tensor, generated: &Tensor) -> Result<f32, SynthError> {
    mean_of(reference, generated, |d| d * d)
}

pub fn mae(reference: &Tensor, generated: &Tensor) -> Result<f32, SynthError> {
    mean_of(reference, generated, f32::abs)
}

/// 峰值信噪比；两者完全相同时为正无穷
pub fn psnr(reference: &Tensor, generated: &Tensor) -> Result<f32, SynthError> {
    let mse = mse(reference, generated)?;
    if mse == 0.0 {
        return Ok(f32::INFINITY);
    }
    Ok(10.0 * (DATA_RANGE * DATA_RANGE / mse).log10())
}

/// 均值、方差与协方差（总体统计量）
fn moments(reference: &Tensor, generated: &Tensor) -> Result<(f32, f32, f32, f32, f32), SynthError> {
    check_shapes(reference, generated)?;
    let mean_a = reference.mean();
    let mean_b = generated.mean();
    let n = reference.size().max(1) as f32;
    let (mut var_a, mut var_b, mut cov) = (0.0, 0.0, 0.0);
    for (&a, &b) in reference.data().iter().zip(generated.data().iter()) {
        let (da, db) = (a - mean_a, b - mean_b);
        var_a += da * da;
        var_b += db * db;
        cov += da * db;
    }
    Ok((mean_a, mean_b, var_a / n, var_b / n, cov / n))
}

/// 归一化互相关；任一输入为常数时定义为 0
pub fn ncc(reference: &Tensor, generated: &Tensor) -> Result<f32, SynthError> {
    let (_, _, var_a, var_b, cov) = moments(reference, generated)?;
    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        return Ok(0.0);
    }
    Ok(cov / denominator)
}

/// 全局（不开窗）结构相似度
pub fn ssim(reference: &Tensor, generated: &Tensor) -> Result<f32, SynthError> {
    let (mean_a, mean_b, var_a, var_b, cov) = moments(reference, generated)?;
    let c1 = (SSIM_K1 * DATA_RANGE).powi(2);
    let c2 = (SSIM_K2 * DATA_RANGE).powi(2);
    let numerator = (2.0 * mean_a * mean_b + c1) * (2.0 * cov + c2);
    let denominator = (mean_a * mean_a + mean_b * mean_b + c1) * (var_a + var_b + c2);
    Ok(numerator / denominator)
}
