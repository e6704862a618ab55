/*
 * @Date         : 2026-02-05
 * @Description  : DataLoader - PyTorch 风格的数据批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 随机打乱 (shuffle)
 * - 丢弃不完整批次 (drop_last)
 */

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::Dataset;
use crate::errors::SynthError;
use crate::tensor::Tensor;

/// DataLoader - PyTorch 风格的数据批量加载器
///
/// 持有自己的随机数生成器：每次`iter()`都会重新打乱（若开启），
/// 而同一`seed`下整个训练过程的批次顺序与数据增强均可复现。
///
/// # 示例
/// ```ignore
/// let mut loader = DataLoader::new(Box::new(dataset), 32)
///     .shuffle(true)
///     .seed(42);
///
/// for batch in loader.iter() {
///     module.training_step(&batch?, batch_idx)?;
/// }
/// ```
pub struct DataLoader {
    dataset: Box<dyn Dataset>,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    rng: StdRng,
}

impl DataLoader {
    /// 创建新的 DataLoader
    ///
    /// # Panics
    /// `batch_size`为0时
    pub fn new(dataset: Box<dyn Dataset>, batch_size: usize) -> Self {
        assert!(batch_size > 0, "DataLoader: batch_size 必须大于 0");
        Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// 设置是否打乱数据
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于 shuffle 与数据增强）
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// 获取数据集大小
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// 创建迭代器
    pub fn iter(&mut self) -> DataLoaderIterator<'_> {
        let mut indices: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            indices.shuffle(&mut self.rng);
        }
        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
        }
    }
}

/// DataLoader 迭代器，逐批产出`[B, sample_shape...]`张量
pub struct DataLoaderIterator<'a> {
    loader: &'a mut DataLoader,
    indices: Vec<usize>,
    current_batch: usize,
}

impl Iterator for DataLoaderIterator<'_> {
    type Item = Result<Tensor, SynthError>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.indices.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;

        // 检查是否还有数据
        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);
        // 如果 drop_last 且批次不完整，则跳过
        if self.loader.drop_last && end - start < batch_size {
            return None;
        }
        self.current_batch += 1;

        let loader = &mut *self.loader;
        let samples: Result<Vec<Tensor>, SynthError> = self.indices[start..end]
            .iter()
            .map(|&idx| loader.dataset.get(idx, &mut loader.rng))
            .collect();
        Some(samples.and_then(|samples| Tensor::stack(&samples)))
    }
}
