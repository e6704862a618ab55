/*
 * @Date         : 2026-02-03
 * @Description  : 顺序网络：按顺序堆叠若干层
 */

use super::{Layer, LayerEnum, Network, Parameter};
use crate::errors::SynthError;
use crate::tensor::Tensor;

/// 顺序网络
///
/// 任意形状`[N, ...]`的输入都会先展平为`[N, features]`再逐层传播，
/// 输出再被重塑为`[N, output_shape...]`。
///
/// # 使用示例
/// ```ignore
/// let mut net = Sequential::new("discriminator", &[1])
///     .add(Linear::new_seeded(784, 128, "d_fc1", &mut rng))
///     .add(LeakyRelu::new(0.2))
///     .add(Linear::new_seeded(128, 1, "d_fc2", &mut rng))
///     .add(Sigmoid::new());
/// let preds = net.forward(&images)?;
/// ```
#[derive(Debug, Clone)]
pub struct Sequential {
    name: String,
    layers: Vec<LayerEnum>,
    output_shape: Vec<usize>,
    /// 最近一次 forward 的输入形状（反向时把梯度还原成该形状）
    input_shape: Option<Vec<usize>>,
}

impl Sequential {
    pub fn new(name: &str, output_shape: &[usize]) -> Self {
        Self {
            name: name.to_string(),
            layers: Vec::new(),
            output_shape: output_shape.to_vec(),
            input_shape: None,
        }
    }

    pub fn add(mut self, layer: impl Into<LayerEnum>) -> Self {
        self.layers.push(layer.into());
        self
    }

    pub fn layers(&self) -> &[LayerEnum] {
        &self.layers
    }

    /// 单个输出样本的形状
    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }
}

impl Network for Sequential {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, SynthError> {
        let mut x = input.to_matrix();
        for layer in self.layers.iter_mut() {
            x = layer.forward(&x)?;
        }
        self.input_shape = Some(input.shape().to_vec());
        Tensor::from_matrix(&x, &self.output_shape)
    }

    fn infer(&self, input: &Tensor) -> Result<Tensor, SynthError> {
        let mut x = input.to_matrix();
        for layer in self.layers.iter() {
            x = layer.infer(&x)?;
        }
        Tensor::from_matrix(&x, &self.output_shape)
    }

    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, SynthError> {
        let input_shape = self
            .input_shape
            .clone()
            .ok_or_else(|| SynthError::BackwardBeforeForward(self.name.clone()))?;
        let mut grad = grad_output.to_matrix();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad)?;
        }
        Tensor::from_matrix(&grad, &input_shape[1..])
    }

    fn parameters(&self) -> Vec<&Parameter> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.parameters_mut())
            .collect()
    }
}
