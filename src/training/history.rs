/*
 * @Date         : 2026-02-08
 * @Description  : epoch 汇总与训练历史
 */

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::errors::SynthError;
use crate::synth::{StepResult, UpdateOutcome};

/// 一个阶段（训练/验证/测试）内所有批次的汇总
///
/// 均值只统计有限值，NaN 批次计入`skipped_*`而不污染均值；没有有限值时为 NaN。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseSummary {
    pub batches: usize,
    pub disc_loss: f32,
    pub gen_loss: f32,
    pub metrics: BTreeMap<String, f32>,
    pub skipped_disc_updates: usize,
    pub skipped_gen_updates: usize,
}

fn finite_mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { f32::NAN } else { sum / count as f32 }
}

impl PhaseSummary {
    pub fn from_results(results: &[StepResult]) -> Self {
        let mut metric_values: BTreeMap<&str, Vec<f32>> = BTreeMap::new();
        for result in results {
            for (name, &value) in &result.metrics {
                metric_values.entry(name.as_str()).or_default().push(value);
            }
        }
        let skipped = |outcomes: Vec<Option<UpdateOutcome>>| {
            outcomes
                .into_iter()
                .filter(|&o| o == Some(UpdateOutcome::Skipped))
                .count()
        };

        Self {
            batches: results.len(),
            disc_loss: finite_mean(results.iter().map(|r| r.disc_loss)),
            gen_loss: finite_mean(results.iter().map(|r| r.gen_loss)),
            metrics: metric_values
                .into_iter()
                .map(|(name, values)| (name.to_string(), finite_mean(values.into_iter())))
                .collect(),
            skipped_disc_updates: skipped(results.iter().map(|r| r.disc_update).collect()),
            skipped_gen_updates: skipped(results.iter().map(|r| r.gen_update).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochSummary {
    pub epoch: usize,
    pub train: PhaseSummary,
    pub val: Option<PhaseSummary>,
    pub test: Option<PhaseSummary>,
    /// 本 epoch 导出的检查点图像数，未导出时为`None`
    pub exported_images: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochSummary>,
}

impl TrainingHistory {
    pub fn push(&mut self, summary: EpochSummary) {
        self.epochs.push(summary);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// 以 JSON 格式写入`path`（NaN 写作`null`）
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SynthError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
