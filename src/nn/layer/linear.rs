/*
 * @Date         : 2026-02-03
 * @Description  : Linear (全连接) 层：`output = x @ W + b`
 */

use ndarray::{Array2, Axis};
use rand::Rng;

use super::Layer;
use crate::errors::SynthError;
use crate::nn::Parameter;

/// Linear (全连接) 层
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
#[derive(Debug, Clone)]
pub struct Linear {
    /// 权重参数 [in_features, out_features]
    weights: Parameter,
    /// 偏置参数 [1, out_features]
    bias: Parameter,
    /// 最近一次 forward 的输入
    input: Option<Array2<f32>>,
    name: String,
}

impl Linear {
    /// 创建新的 Linear 层，权重与偏置均从`U(-1/√in, 1/√in)`采样（与 PyTorch 默认初始化一致）
    pub fn new_seeded<R: Rng>(in_features: usize, out_features: usize, name: &str, rng: &mut R) -> Self {
        let bound = 1.0 / (in_features.max(1) as f32).sqrt();
        let weights = Array2::from_shape_fn((in_features, out_features), |_| {
            rng.gen_range(-bound..=bound)
        });
        let bias = Array2::from_shape_fn((1, out_features), |_| rng.gen_range(-bound..=bound));
        Self {
            weights: Parameter::new(&format!("{name}_W"), weights),
            bias: Parameter::new(&format!("{name}_b"), bias),
            input: None,
            name: name.to_string(),
        }
    }

    /// 用给定的权重与偏置创建层（主要用于测试）
    pub fn from_weights(name: &str, weights: Array2<f32>, bias: Array2<f32>) -> Self {
        Self {
            weights: Parameter::new(&format!("{name}_W"), weights),
            bias: Parameter::new(&format!("{name}_b"), bias),
            input: None,
            name: name.to_string(),
        }
    }

    pub fn in_features(&self) -> usize {
        self.weights.value().nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weights.value().ncols()
    }

    pub fn weights(&self) -> &Parameter {
        &self.weights
    }

    pub fn bias(&self) -> &Parameter {
        &self.bias
    }

    fn check_input(&self, input: &Array2<f32>) -> Result<(), SynthError> {
        if input.ncols() != self.in_features() {
            return Err(SynthError::ShapeMismatch {
                context: format!("Linear层`{}`的输入", self.name),
                expected: vec![input.nrows(), self.in_features()],
                got: input.shape().to_vec(),
            });
        }
        Ok(())
    }
}

impl Layer for Linear {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, SynthError> {
        let output = self.infer(input)?;
        self.input = Some(input.clone());
        Ok(output)
    }

    fn infer(&self, input: &Array2<f32>) -> Result<Array2<f32>, SynthError> {
        self.check_input(input)?;
        // x @ W: [batch, in] @ [in, out] = [batch, out]
        let mut output = input.dot(self.weights.value());
        output += self.bias.value();
        Ok(output)
    }

    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, SynthError> {
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| SynthError::BackwardBeforeForward(self.name.clone()))?;
        // dL/dW = x^T @ g，dL/db = sum(g, axis=0)，dL/dx = g @ W^T
        let grad_weights = input.t().dot(grad_output);
        let grad_bias = grad_output.sum_axis(Axis(0)).insert_axis(Axis(0));
        let grad_input = grad_output.dot(&self.weights.value().t());
        self.weights.accumulate_grad(&grad_weights);
        self.bias.accumulate_grad(&grad_bias);
        Ok(grad_input)
    }

    fn parameters(&self) -> Vec<&Parameter> {
        vec![&self.weights, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        vec![&mut self.weights, &mut self.bias]
    }
}
