/*
 * @Date         : 2026-02-03
 * @Description  : Network trait 定义
 */

use ndarray::Array2;

use super::Parameter;
use crate::errors::SynthError;
use crate::tensor::Tensor;

/// 可训练网络
///
/// # 设计要点
/// - `forward()`会缓存反向传播所需的中间值，`infer()`不缓存、也不需要`&mut self`，
///   评估与推理都应使用后者；
/// - `backward()`把梯度累加到本网络的参数上，并返回对输入的梯度。
///   梯度是否继续流向上游网络由调用方决定，这相当于 PyTorch 里的`detach()`；
/// - 参数只能被优化器（`Optimizer::step`）修改。
pub trait Network {
    fn name(&self) -> &str;

    /// 训练用前向传播（缓存中间值）
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, SynthError>;

    /// 无梯度前向传播
    fn infer(&self, input: &Tensor) -> Result<Tensor, SynthError>;

    /// 反向传播：累加参数梯度，返回对最近一次`forward`输入的梯度
    fn backward(&mut self, grad_output: &Tensor) -> Result<Tensor, SynthError>;

    fn parameters(&self) -> Vec<&Parameter>;

    fn parameters_mut(&mut self) -> Vec<&mut Parameter>;

    /// 清零所有参数的梯度
    fn zero_grad(&mut self) {
        for param in self.parameters_mut() {
            param.zero_grad();
        }
    }

    /// 参数（元素）总数
    fn num_params(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }

    /// 所有参数值的快照
    fn snapshot(&self) -> Vec<Array2<f32>> {
        self.parameters().iter().map(|p| p.value().clone()).collect()
    }
}
