use ndarray::Array2;

/// 可训练参数：参数值及与之同形状的累积梯度
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    value: Array2<f32>,
    grad: Array2<f32>,
}

impl Parameter {
    pub fn new(name: &str, value: Array2<f32>) -> Self {
        let grad = Array2::zeros(value.raw_dim());
        Self {
            name: name.to_string(),
            value,
            grad,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Array2<f32> {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Array2<f32> {
        &mut self.value
    }

    pub fn grad(&self) -> &Array2<f32> {
        &self.grad
    }

    pub fn grad_mut(&mut self) -> &mut Array2<f32> {
        &mut self.grad
    }

    /// 同时借出可变的参数值与只读的梯度（优化器更新用）
    pub fn value_and_grad_mut(&mut self) -> (&mut Array2<f32>, &Array2<f32>) {
        (&mut self.value, &self.grad)
    }

    /// 梯度累加（多次 backward 的梯度相加，与 PyTorch 一致）
    pub fn accumulate_grad(&mut self, grad: &Array2<f32>) {
        self.grad += grad;
    }

    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }

    /// 参数元素个数
    pub fn size(&self) -> usize {
        self.value.len()
    }
}
