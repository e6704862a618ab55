/*
 * @Date         : 2026-02-03
 * @Description  : 网络层。每个层都处理`[batch, features]`形状的矩阵。
 */

use enum_dispatch::enum_dispatch;
use ndarray::Array2;

use super::Parameter;
use crate::errors::SynthError;

mod activation;
mod linear;

pub use activation::{LeakyRelu, Relu, Sigmoid, Tanh};
pub use linear::Linear;

/// 层的公共接口
#[enum_dispatch]
pub trait Layer {
    fn name(&self) -> &str;
    /// 训练用前向传播，缓存反向所需的中间值
    fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, SynthError>;
    /// 不缓存任何中间值的前向传播
    fn infer(&self, input: &Array2<f32>) -> Result<Array2<f32>, SynthError>;
    /// 反向传播：累加参数梯度并返回对输入的梯度
    fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, SynthError>;
    fn parameters(&self) -> Vec<&Parameter>;
    fn parameters_mut(&mut self) -> Vec<&mut Parameter>;
}

#[enum_dispatch(Layer)]
#[derive(Debug, Clone)]
pub enum LayerEnum {
    Linear,
    LeakyRelu,
    Relu,
    Sigmoid,
    Tanh,
}
