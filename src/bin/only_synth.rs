/*
 * @Date         : 2026-02-08
 * @Description  : 命令行入口
 */

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use only_synth::config::ConfigManager;
use only_synth::data::DataManifest;
use only_synth::errors::SynthError;
use only_synth::logging::init_logging;
use only_synth::training::{DataSources, TrainingManager};

#[derive(Parser)]
#[command(name = "only_synth")]
#[command(about = "对抗生成网络（GAN）合成模型训练工具")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 日志详细程度（可重复，如 -vv）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 训练模型
    Train {
        /// YAML 配置文件
        #[arg(short, long)]
        config: PathBuf,

        /// 训练样本清单（CSV）
        #[arg(long)]
        train_csv: PathBuf,

        /// 输出目录（检查点图像与训练历史）
        #[arg(short, long)]
        output_dir: PathBuf,

        /// 验证样本清单（CSV）
        #[arg(long)]
        val_csv: Option<PathBuf>,

        /// 测试样本清单（CSV）
        #[arg(long)]
        test_csv: Option<PathBuf>,

        /// 未提供验证清单时，从训练清单中抽取的比例
        #[arg(long, default_value_t = 0.0)]
        val_ratio: f64,

        /// 未提供测试清单时，从训练清单中抽取的比例
        #[arg(long, default_value_t = 0.0)]
        test_ratio: f64,
    },
}

fn load_manifest(path: Option<PathBuf>) -> Result<Option<DataManifest>, SynthError> {
    path.map(|p| DataManifest::from_csv_path(&p))
        .transpose()
        .map_err(SynthError::from)
}

fn run(command: Commands) -> Result<(), SynthError> {
    match command {
        Commands::Train {
            config,
            train_csv,
            output_dir,
            val_csv,
            test_csv,
            val_ratio,
            test_ratio,
        } => {
            let (global_config, model_config) = ConfigManager::new(&config).prepare_configs()?;
            // 每个清单中的相对路径都以各自 CSV 文件所在目录为基准
            let sources = DataSources::new(DataManifest::from_csv_path(&train_csv)?)
                .val(load_manifest(val_csv)?)
                .test(load_manifest(test_csv)?)
                .val_ratio(val_ratio)
                .test_ratio(test_ratio);

            let mut manager = TrainingManager::new(sources, output_dir, global_config, model_config)?;
            let epochs = manager.run_training()?.len();
            println!(
                "训练完成：{epochs}个 epoch，训练历史已写入{}",
                manager.history_path().display()
            );
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
