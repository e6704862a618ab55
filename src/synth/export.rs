/*
 * @Date         : 2026-02-07
 * @Description  : 检查点图像导出：每隔若干 epoch，用固定种子的潜向量生成一组图像并写入
 *                 `<output_dir>/eval_images/epoch_<N>/fake_image_<idx>.png`
 */

use std::path::{Path, PathBuf};

use ndarray::Axis;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ModelConfig, OutputActivation};
use crate::errors::SynthError;
use crate::nn::Network;
use crate::tensor::Tensor;

/// 一次导出的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub epoch: usize,
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
    pub batch_sizes: Vec<usize>,
}

/// 间隔≤0 表示关闭导出
pub fn should_export(interval: i64, epoch: usize) -> bool {
    interval > 0 && (epoch as i64) % interval == 0
}

/// 覆盖`total`张图像所需的各批大小：除最后一批外均为`batch_size`，
/// 最后一批为余数（余数为0时为满批）
pub fn export_batch_sizes(total: usize, batch_size: usize) -> Vec<usize> {
    if total == 0 || batch_size == 0 {
        return Vec::new();
    }
    let n_batches = total.div_ceil(batch_size);
    let remainder = total % batch_size;
    (0..n_batches)
        .map(|i| {
            if i + 1 == n_batches && remainder > 0 {
                remainder
            } else {
                batch_size
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct CheckpointExporter {
    output_dir: PathBuf,
    interval: i64,
    total: usize,
    batch_size: usize,
    output_activation: OutputActivation,
}

impl CheckpointExporter {
    pub fn from_config(config: &ModelConfig, output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            interval: config.save_eval_images_every_n_epochs,
            total: config.n_fixed_images_to_generate,
            batch_size: config.fixed_images_batch_size,
            output_activation: config.architecture.generator_output,
        }
    }

    pub fn is_due(&self, epoch: usize) -> bool {
        should_export(self.interval, epoch)
    }

    /// 固定潜向量一共需要的数量
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn epoch_dir(&self, epoch: usize) -> PathBuf {
        self.output_dir
            .join("eval_images")
            .join(format!("epoch_{epoch}"))
    }

    /// 逐批把`fixed_latent`（共`total`个）送入生成器，图像编号在整个 epoch 内连续递增
    pub fn export(
        &self,
        epoch: usize,
        generator: &dyn Network,
        fixed_latent: &Tensor,
    ) -> Result<ExportReport, SynthError> {
        let directory = self.epoch_dir(epoch);
        std::fs::create_dir_all(&directory)?;

        let batch_sizes = export_batch_sizes(self.total, self.batch_size);
        let mut files = Vec::with_capacity(self.total);
        let mut start = 0;
        for &size in &batch_sizes {
            let latent = fixed_latent.slice_batch(start, start + size);
            let images = generator.infer(&latent)?;
            for n in 0..images.batch_size() {
                let path = directory.join(format!("fake_image_{}.png", files.len()));
                self.to_displayable(&images.sample(n)).to_image()?.save(&path)?;
                files.push(path);
            }
            debug!("导出批次：{size}张图像");
            start += size;
        }

        info!(
            "epoch {epoch}：已导出{}张检查点图像到{}",
            files.len(),
            directory.display()
        );
        Ok(ExportReport {
            epoch,
            directory,
            files,
            batch_sizes,
        })
    }

    /// 映射到[0, 1]；三维样本`[C, D, H, W]`取中间的深度切片
    fn to_displayable(&self, sample: &Tensor) -> Tensor {
        let sample = if sample.dimension() == 4 {
            let depth = sample.shape()[1];
            Tensor::from_array(sample.data().index_axis(Axis(1), depth / 2).to_owned())
        } else {
            sample.clone()
        };
        match self.output_activation {
            OutputActivation::Sigmoid => sample,
            OutputActivation::Tanh => sample.map(|x| (x + 1.0) / 2.0),
        }
    }
}
