/*
 * @Date         : 2026-02-06
 * @Description  : 模型配置：构造完成后在整个训练过程中只读
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ComparisonOperator, SynthError};

/// 对抗双方的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkRole {
    Generator,
    Discriminator,
}

impl fmt::Display for NetworkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkRole::Generator => write!(f, "generator"),
            NetworkRole::Discriminator => write!(f, "discriminator"),
        }
    }
}

/// 生成器与判别器各一份的配置/对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerNetwork<T> {
    pub generator: T,
    pub discriminator: T,
}

impl<T> PerNetwork<T> {
    pub fn new(generator: T, discriminator: T) -> Self {
        Self {
            generator,
            discriminator,
        }
    }

    pub fn get(&self, role: NetworkRole) -> &T {
        match role {
            NetworkRole::Generator => &self.generator,
            NetworkRole::Discriminator => &self.discriminator,
        }
    }

    pub fn get_mut(&mut self, role: NetworkRole) -> &mut T {
        match role {
            NetworkRole::Generator => &mut self.generator,
            NetworkRole::Discriminator => &mut self.discriminator,
        }
    }
}

/// 梯度裁剪方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipMode {
    /// 按全局 L2 范数缩放
    #[default]
    Norm,
    /// 逐元素截断到[-threshold, threshold]
    Value,
}

/// 学习率调度器的推进时机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPolicy {
    /// 每个批次都推进，无论优化器是否因 NaN 跳过了更新
    #[default]
    EveryBatch,
    /// 只在优化器真正更新了参数之后推进
    AfterUpdate,
}

/// 标注范式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelingParadigm {
    #[default]
    Unlabeled,
    Patient,
    Custom,
}

impl fmt::Display for LabelingParadigm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelingParadigm::Unlabeled => write!(f, "unlabeled"),
            LabelingParadigm::Patient => write!(f, "patient"),
            LabelingParadigm::Custom => write!(f, "custom"),
        }
    }
}

/// 模型族（由`model_name`解析而来）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Dcgan,
}

impl FromStr for ModelFamily {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dcgan" => Ok(ModelFamily::Dcgan),
            _ => Err(SynthError::UnknownComponent {
                kind: "模型族",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::Dcgan => write!(f, "dcgan"),
        }
    }
}

/// 生成器输出层的激活函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputActivation {
    #[default]
    Sigmoid,
    Tanh,
}

/// 网络结构参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    pub latent_vector_size: usize,
    /// 空间形状：二维为[H, W]，三维为[D, H, W]
    pub input_shape: Vec<usize>,
    #[serde(default = "default_channels")]
    pub n_channels: usize,
    #[serde(default = "default_generator_hidden")]
    pub generator_hidden: Vec<usize>,
    #[serde(default = "default_discriminator_hidden")]
    pub discriminator_hidden: Vec<usize>,
    #[serde(default = "default_slope")]
    pub leaky_relu_slope: f32,
    #[serde(default)]
    pub generator_output: OutputActivation,
}

/// 优化器参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSpec {
    pub name: String,
    #[serde(default = "default_lr", alias = "lr")]
    pub learning_rate: f32,
    #[serde(default = "default_betas")]
    pub betas: [f32; 2],
    #[serde(default = "default_eps")]
    pub eps: f32,
    #[serde(default)]
    pub weight_decay: f32,
    #[serde(default)]
    pub momentum: f32,
}

/// 学习率调度器参数（未用到的字段被忽略）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSpec {
    pub name: String,
    #[serde(default = "default_step_size")]
    pub step_size: usize,
    #[serde(default = "default_gamma")]
    pub gamma: f32,
    #[serde(default = "default_t_max")]
    pub t_max: usize,
    #[serde(default)]
    pub min_lr: f32,
    #[serde(default = "default_warmup_steps")]
    pub warmup_steps: usize,
}

/// 两个网络的调度器都是可选的
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchedulerSpecs {
    pub generator: Option<SchedulerSpec>,
    pub discriminator: Option<SchedulerSpec>,
}

/// 模型配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub labeling_paradigm: LabelingParadigm,
    pub architecture: Architecture,
    /// 损失函数名称
    pub losses: PerNetwork<String>,
    pub optimizers: PerNetwork<OptimizerSpec>,
    pub schedulers: Option<SchedulerSpecs>,
    pub n_dimensions: usize,
    /// 混合精度（此处为静态损失缩放）
    pub amp: bool,
    /// 梯度裁剪阈值，`None`为不裁剪
    pub clip_grad: Option<f32>,
    pub clip_mode: ClipMode,
    /// 每隔多少个 epoch 导出一次固定潜向量生成的图像，≤0 表示不导出
    pub save_eval_images_every_n_epochs: i64,
    pub n_fixed_images_to_generate: usize,
    pub fixed_images_batch_size: usize,
    pub fixed_latent_vector_seed: u64,
    pub scheduler_policy: SchedulerPolicy,
    /// 网络权重初始化所用的种子
    pub init_seed: u64,
}

impl ModelConfig {
    /// 检查取值层面的前置条件（键是否存在已由配置解析器保证）
    pub fn validate(&self) -> Result<(), SynthError> {
        self.model_family()?;
        let arch = &self.architecture;
        SynthError::check(
            "latent_vector_size",
            arch.latent_vector_size as f64,
            ComparisonOperator::GreaterThan,
            0.0,
        )?;
        SynthError::check(
            "n_channels",
            arch.n_channels as f64,
            ComparisonOperator::GreaterThan,
            0.0,
        )?;
        // 导出的图片只能是灰度或 RGB
        if self.save_eval_images_every_n_epochs > 0 && !matches!(arch.n_channels, 1 | 3) {
            return Err(SynthError::invalid_config(
                "architecture.n_channels",
                format!(
                    "开启图像导出时通道数只能是1或3，实际为{}；可将save_eval_images_every_n_epochs设为0",
                    arch.n_channels
                ),
            ));
        }
        if !(2..=3).contains(&self.n_dimensions) {
            return Err(SynthError::invalid_config(
                "n_dimensions",
                format!("只支持2或3，实际为{}", self.n_dimensions),
            ));
        }
        if arch.input_shape.len() != self.n_dimensions {
            return Err(SynthError::invalid_config(
                "architecture.input_shape",
                format!(
                    "长度应为n_dimensions={}，实际为{:?}",
                    self.n_dimensions, arch.input_shape
                ),
            ));
        }
        if arch.input_shape.contains(&0) {
            return Err(SynthError::invalid_config(
                "architecture.input_shape",
                "各维度都必须大于0",
            ));
        }
        SynthError::check(
            "fixed_images_batch_size",
            self.fixed_images_batch_size as f64,
            ComparisonOperator::GreaterThan,
            0.0,
        )?;
        if let Some(clip) = self.clip_grad {
            SynthError::check("clip_grad", clip as f64, ComparisonOperator::GreaterThan, 0.0)?;
        }
        for spec in [&self.optimizers.generator, &self.optimizers.discriminator] {
            SynthError::check(
                "learning_rate",
                spec.learning_rate as f64,
                ComparisonOperator::GreaterThan,
                0.0,
            )?;
        }
        Ok(())
    }

    pub fn model_family(&self) -> Result<ModelFamily, SynthError> {
        self.model_name.parse()
    }

    /// 单个样本的形状：[C, H, W] 或 [C, D, H, W]
    pub fn sample_shape(&self) -> Vec<usize> {
        let mut shape = vec![self.architecture.n_channels];
        shape.extend_from_slice(&self.architecture.input_shape);
        shape
    }
}

fn default_channels() -> usize {
    1
}

fn default_generator_hidden() -> Vec<usize> {
    vec![128, 256]
}

fn default_discriminator_hidden() -> Vec<usize> {
    vec![256, 128]
}

fn default_slope() -> f32 {
    0.2
}

fn default_lr() -> f32 {
    2e-4
}

fn default_betas() -> [f32; 2] {
    [0.5, 0.999]
}

fn default_eps() -> f32 {
    1e-8
}

fn default_step_size() -> usize {
    1
}

fn default_gamma() -> f32 {
    0.1
}

fn default_t_max() -> usize {
    100
}

fn default_warmup_steps() -> usize {
    10
}
