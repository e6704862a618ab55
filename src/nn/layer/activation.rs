/*
 * @Date         : 2026-02-03
 * @Description  : 逐元素激活层（无可训练参数）
 */

use ndarray::{Array2, Zip};

use super::Layer;
use crate::errors::SynthError;
use crate::nn::Parameter;

/// 逐元素激活函数：f(x) 与 f'(x)。`derivative`同时拿到输入与输出，各激活取其所需。
trait Elementwise {
    fn apply(&self, x: f32) -> f32;
    fn derivative(&self, x: f32, y: f32) -> f32;
}

/// 为激活层生成`Layer`实现，缓存最近一次 forward 的输入与输出
macro_rules! activation_layer {
    ($ty:ident) => {
        impl Layer for $ty {
            fn name(&self) -> &str {
                stringify!($ty)
            }

            fn forward(&mut self, input: &Array2<f32>) -> Result<Array2<f32>, SynthError> {
                let output = self.infer(input)?;
                self.cache = Some((input.clone(), output.clone()));
                Ok(output)
            }

            fn infer(&self, input: &Array2<f32>) -> Result<Array2<f32>, SynthError> {
                Ok(input.mapv(|x| self.apply(x)))
            }

            fn backward(&mut self, grad_output: &Array2<f32>) -> Result<Array2<f32>, SynthError> {
                let (input, output) = self
                    .cache
                    .as_ref()
                    .ok_or_else(|| SynthError::BackwardBeforeForward(stringify!($ty).to_string()))?;
                if grad_output.shape() != output.shape() {
                    return Err(SynthError::ShapeMismatch {
                        context: format!("{}层的反向梯度", stringify!($ty)),
                        expected: output.shape().to_vec(),
                        got: grad_output.shape().to_vec(),
                    });
                }
                let mut grad_input = grad_output.clone();
                Zip::from(&mut grad_input)
                    .and(input)
                    .and(output)
                    .for_each(|g, &x, &y| *g *= self.derivative(x, y));
                Ok(grad_input)
            }

            fn parameters(&self) -> Vec<&Parameter> {
                Vec::new()
            }

            fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
                Vec::new()
            }
        }
    };
}

/// LeakyReLU：x ≥ 0 时为 x，否则为 slope·x
#[derive(Debug, Clone)]
pub struct LeakyRelu {
    slope: f32,
    cache: Option<(Array2<f32>, Array2<f32>)>,
}

impl LeakyRelu {
    pub fn new(slope: f32) -> Self {
        Self { slope, cache: None }
    }
}

impl Elementwise for LeakyRelu {
    fn apply(&self, x: f32) -> f32 {
        if x >= 0.0 { x } else { self.slope * x }
    }

    fn derivative(&self, x: f32, _y: f32) -> f32 {
        if x >= 0.0 { 1.0 } else { self.slope }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Relu {
    cache: Option<(Array2<f32>, Array2<f32>)>,
}

impl Relu {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Elementwise for Relu {
    fn apply(&self, x: f32) -> f32 {
        // NaN 需要原样传播，不能用 f32::max
        if x < 0.0 { 0.0 } else { x }
    }

    fn derivative(&self, x: f32, _y: f32) -> f32 {
        if x > 0.0 { 1.0 } else { 0.0 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sigmoid {
    cache: Option<(Array2<f32>, Array2<f32>)>,
}

impl Sigmoid {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Elementwise for Sigmoid {
    fn apply(&self, x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    fn derivative(&self, _x: f32, y: f32) -> f32 {
        y * (1.0 - y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tanh {
    cache: Option<(Array2<f32>, Array2<f32>)>,
}

impl Tanh {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Elementwise for Tanh {
    fn apply(&self, x: f32) -> f32 {
        x.tanh()
    }

    fn derivative(&self, _x: f32, y: f32) -> f32 {
        1.0 - y * y
    }
}

activation_layer!(LeakyRelu);
activation_layer!(Relu);
activation_layer!(Sigmoid);
activation_layer!(Tanh);
