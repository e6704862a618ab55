/*
 * @Date         : 2026-02-05
 * @Description  : 训练/验证/测试数据划分
 */

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use super::DataManifest;
use crate::errors::{ComparisonOperator, SynthError};

/// 三个互不相交的数据划分，在第一个 epoch 开始前定型，此后不再修改
#[derive(Debug, Clone)]
pub struct DataPartitions {
    pub train: DataManifest,
    pub val: Option<DataManifest>,
    pub test: Option<DataManifest>,
}

impl DataPartitions {
    /// 准备数据划分
    ///
    /// 1. 校验比例：各自位于[0, 1]，且两者之和不超过1（否则为致命错误）；
    /// 2. 对不一致/缺失的配置给出警告；
    /// 3. 若未显式提供测试/验证集但比例为正，则从训练清单中随机抽取，
    ///    先抽测试集，再从剩余的训练清单中抽验证集。
    pub fn prepare(
        train: DataManifest,
        val: Option<DataManifest>,
        test: Option<DataManifest>,
        val_ratio: f64,
        test_ratio: f64,
        seed: u64,
    ) -> Result<Self, SynthError> {
        validate_ratios(val_ratio, test_ratio)?;
        warn_user(val.is_some(), test.is_some(), val_ratio, test_ratio);

        let mut train = train;
        let mut rng = StdRng::seed_from_u64(seed);
        let test = match test {
            Some(test) => Some(test),
            None if test_ratio != 0.0 => Some(train.extract_random(test_ratio, &mut rng)),
            None => None,
        };
        let val = match val {
            Some(val) => Some(val),
            None if val_ratio != 0.0 => Some(train.extract_random(val_ratio, &mut rng)),
            None => None,
        };

        info!(
            "数据划分完成：训练集{}条，验证集{}条，测试集{}条",
            train.len(),
            val.as_ref().map_or(0, DataManifest::len),
            test.as_ref().map_or(0, DataManifest::len)
        );
        Ok(Self { train, val, test })
    }
}

/// 校验划分比例（在处理任何数据之前调用）
pub fn validate_ratios(val_ratio: f64, test_ratio: f64) -> Result<(), SynthError> {
    for (name, ratio) in [("val_ratio", val_ratio), ("test_ratio", test_ratio)] {
        SynthError::check(name, ratio, ComparisonOperator::GreaterOrEqual, 0.0)?;
        SynthError::check(name, ratio, ComparisonOperator::LessOrEqual, 1.0)?;
    }
    if val_ratio + test_ratio > 1.0 {
        return Err(SynthError::RatioSumExceeded {
            val_ratio,
            test_ratio,
        });
    }
    Ok(())
}

fn warn_user(has_val: bool, has_test: bool, val_ratio: f64, test_ratio: f64) {
    if !has_val && val_ratio == 0.0 {
        warn!("未提供验证数据且验证比例为0，训练过程中将不进行验证");
    }
    if !has_test && test_ratio == 0.0 {
        warn!("未提供测试数据且测试比例为0，训练过程中将不进行测试");
    }
    if has_val && val_ratio != 0.0 {
        warn!("同时提供了验证数据与非零的验证比例（{val_ratio}），将使用提供的验证数据并忽略该比例");
    }
    if has_test && test_ratio != 0.0 {
        warn!("同时提供了测试数据与非零的测试比例（{test_ratio}），将使用提供的测试数据并忽略该比例");
    }
    if !has_val && val_ratio != 0.0 {
        warn!(
            "未提供验证数据，将按比例{val_ratio}从训练数据中随机抽取。\
             注意：抽样不区分样本所属的受试者，若需避免同一受试者的样本同时出现在训练集与验证集中，请显式提供验证数据"
        );
    }
    if !has_test && test_ratio != 0.0 {
        warn!(
            "未提供测试数据，将按比例{test_ratio}从训练数据中随机抽取。\
             注意：抽样不区分样本所属的受试者，若需避免同一受试者的样本同时出现在训练集与测试集中，请显式提供测试数据"
        );
    }
}
