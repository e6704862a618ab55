/*
 * @Date         : 2026-02-08
 * @Description  : 训练管理器：划分数据、构造数据加载器与合成模块，按 epoch 驱动训练、验证与测试
 */

mod history;

#[cfg(test)]
mod tests;

pub use history::{EpochSummary, PhaseSummary, TrainingHistory};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{GlobalConfig, ModelConfig};
use crate::data::{
    Compose, DataLoader, DataManifest, DataPartitions, DataRole, DataloaderFactory, Dataset,
    DatasetFactory,
};
use crate::errors::SynthError;
use crate::synth::{ModuleFactory, StepResult, SynthesisModule, get_metrics};
use crate::tensor::Tensor;

/// 训练历史的文件名（位于输出目录下）
pub const HISTORY_FILE: &str = "training_history.json";

/// 训练数据来源：训练清单，可选的验证/测试清单，以及从训练清单中抽取它们的比例
#[derive(Debug, Clone)]
pub struct DataSources {
    train: DataManifest,
    val: Option<DataManifest>,
    test: Option<DataManifest>,
    val_ratio: f64,
    test_ratio: f64,
    base_dir: Option<PathBuf>,
}

impl DataSources {
    pub fn new(train: DataManifest) -> Self {
        Self {
            train,
            val: None,
            test: None,
            val_ratio: 0.0,
            test_ratio: 0.0,
            base_dir: None,
        }
    }

    pub fn val(mut self, val: Option<DataManifest>) -> Self {
        self.val = val;
        self
    }

    pub fn test(mut self, test: Option<DataManifest>) -> Self {
        self.test = test;
        self
    }

    pub fn val_ratio(mut self, ratio: f64) -> Self {
        self.val_ratio = ratio;
        self
    }

    pub fn test_ratio(mut self, ratio: f64) -> Self {
        self.test_ratio = ratio;
        self
    }

    /// 未从 CSV 文件读取的清单（自身没有基准目录）中相对路径的基准目录
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }
}

pub struct TrainingManager {
    global_config: GlobalConfig,
    output_dir: PathBuf,
    module: Box<dyn SynthesisModule>,
    train_loader: DataLoader,
    val_loader: Option<DataLoader>,
    test_loader: Option<DataLoader>,
    history: TrainingHistory,
}

impl TrainingManager {
    /// 从样本清单构造：先校验比例并划分数据（测试集先于验证集抽取），再为每个划分构造数据集
    pub fn new(
        sources: DataSources,
        output_dir: impl Into<PathBuf>,
        global_config: GlobalConfig,
        model_config: ModelConfig,
    ) -> Result<Self, SynthError> {
        let partitions = DataPartitions::prepare(
            sources.train,
            sources.val,
            sources.test,
            sources.val_ratio,
            sources.test_ratio,
            global_config.seed,
        )?;

        let factory = DatasetFactory::new(sources.base_dir);
        let sample_shape = model_config.sample_shape();
        let build = |manifest: DataManifest, role: DataRole| {
            let transform = Compose::for_role(
                &global_config.data_preprocessing,
                &global_config.data_augmentations,
                role,
            );
            factory.get_dataset(
                manifest,
                transform,
                model_config.labeling_paradigm,
                &sample_shape,
            )
        };
        let train = build(partitions.train, DataRole::Train)?;
        let val = partitions
            .val
            .map(|m| build(m, DataRole::Validation))
            .transpose()?;
        let test = partitions
            .test
            .map(|m| build(m, DataRole::Test))
            .transpose()?;

        Self::from_datasets(train, val, test, output_dir, global_config, model_config)
    }

    /// 直接使用已构造好的数据集
    pub fn from_datasets(
        train: Box<dyn Dataset>,
        val: Option<Box<dyn Dataset>>,
        test: Option<Box<dyn Dataset>>,
        output_dir: impl Into<PathBuf>,
        global_config: GlobalConfig,
        model_config: ModelConfig,
    ) -> Result<Self, SynthError> {
        global_config.validate()?;
        model_config.validate()?;
        let output_dir = output_dir.into();

        let loaders = DataloaderFactory::from_config(&global_config);
        let train_loader = loaders.get_training_dataloader(train);
        let val_loader = val.map(|d| loaders.get_validation_dataloader(d));
        let test_loader = test.map(|d| loaders.get_testing_dataloader(d));

        let metrics = get_metrics(&global_config.metrics)?;
        let postprocessing = if global_config.data_postprocessing.is_empty() {
            None
        } else {
            Some(Compose::new(global_config.data_postprocessing.clone()))
        };
        let module =
            ModuleFactory::new(model_config, output_dir.clone(), metrics, postprocessing)
                .get_module()?;

        Ok(Self {
            global_config,
            output_dir,
            module,
            train_loader,
            val_loader,
            test_loader,
            history: TrainingHistory::default(),
        })
    }

    /// 运行全部 epoch，结束后把训练历史写入`<output_dir>/training_history.json`
    pub fn run_training(&mut self) -> Result<&TrainingHistory, SynthError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let num_epochs = self.global_config.num_epochs;
        info!(
            "开始训练：共{num_epochs}个 epoch，每个 epoch {}个训练批次",
            self.train_loader.num_batches()
        );

        for epoch in 0..num_epochs {
            let module = &mut self.module;
            let train = run_phase(&mut self.train_loader, |batch, idx| {
                module.training_step(batch, idx)
            })?;
            let exported_images = module.on_train_epoch_end(epoch)?.map(|r| r.files.len());
            let val = self
                .val_loader
                .as_mut()
                .map(|loader| run_phase(loader, |batch, idx| module.validation_step(batch, idx)))
                .transpose()?;
            let test = self
                .test_loader
                .as_mut()
                .map(|loader| run_phase(loader, |batch, idx| module.test_step(batch, idx)))
                .transpose()?;

            log_epoch(epoch, num_epochs, &train, val.as_ref(), test.as_ref());
            self.history.push(EpochSummary {
                epoch,
                train,
                val,
                test,
                exported_images,
            });
        }

        self.history.save(self.history_path())?;
        Ok(&self.history)
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    pub fn history_path(&self) -> PathBuf {
        self.output_dir.join(HISTORY_FILE)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn module(&self) -> &dyn SynthesisModule {
        self.module.as_ref()
    }

    pub fn module_mut(&mut self) -> &mut dyn SynthesisModule {
        self.module.as_mut()
    }
}

/// 遍历一个数据加载器的全部批次，批次序号从0开始
fn run_phase(
    loader: &mut DataLoader,
    mut step: impl FnMut(&Tensor, usize) -> Result<StepResult, SynthError>,
) -> Result<PhaseSummary, SynthError> {
    let mut results = Vec::with_capacity(loader.num_batches());
    for (batch_idx, batch) in loader.iter().enumerate() {
        results.push(step(&batch?, batch_idx)?);
    }
    debug!("阶段结束：{}个批次", results.len());
    Ok(PhaseSummary::from_results(&results))
}

fn log_epoch(
    epoch: usize,
    num_epochs: usize,
    train: &PhaseSummary,
    val: Option<&PhaseSummary>,
    test: Option<&PhaseSummary>,
) {
    info!(
        "Epoch {}/{}: disc_loss={:.4}, gen_loss={:.4}, 跳过的更新（判别器/生成器）={}/{}",
        epoch + 1,
        num_epochs,
        train.disc_loss,
        train.gen_loss,
        train.skipped_disc_updates,
        train.skipped_gen_updates
    );
    for (name, summary) in [("val", val), ("test", test)] {
        if let Some(summary) = summary {
            info!(
                "  {name}: disc_loss={:.4}, gen_loss={:.4}, metrics={:?}",
                summary.disc_loss, summary.gen_loss, summary.metrics
            );
        }
    }
}
