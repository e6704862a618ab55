/*
 * @Date         : 2026-02-05
 * @Description  : 样本清单（manifest）：CSV 表格，每行一个样本，`Channel*`列为各通道图像的路径
 */

use std::io::Read;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::index;

use super::DataError;

/// 清单中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    /// 行在原始清单中的位置，划分前后保持不变，用于判断样本身份
    pub id: usize,
    pub values: Vec<String>,
}

/// 样本清单
///
/// # 使用示例
/// ```ignore
/// let mut train = DataManifest::from_csv_path("train.csv")?;
/// let val = train.extract_random(0.2, &mut rng); // train 中被抽走的行不再存在
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataManifest {
    headers: Vec<String>,
    rows: Vec<ManifestRow>,
    /// 行内相对路径的基准目录；从 CSV 文件读取时为该文件所在目录
    base_dir: Option<PathBuf>,
}

impl DataManifest {
    /// 由表头与各行数据创建清单，行号即`id`
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(id, values)| ManifestRow { id, values })
            .collect();
        Self {
            headers,
            rows,
            base_dir: None,
        }
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::FileNotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let manifest = Self::from_csv_reader(file)?;
        Ok(match path.parent() {
            Some(dir) => manifest.with_base_dir(dir),
            None => manifest,
        })
    }

    /// 从任意 CSV 数据源读取（第一行须为表头）
    pub fn from_csv_reader(reader: impl Read) -> Result<Self, DataError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }
        Ok(Self::new(headers, rows))
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 所有行的`id`（按当前顺序）
    pub fn ids(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// 通道列（列名以`Channel`开头，大小写不敏感）的下标
    pub fn channel_columns(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.to_lowercase().starts_with("channel"))
            .map(|(i, _)| i)
            .collect()
    }

    /// 第`row`行第`column`列的值
    pub fn value(&self, row: usize, column: usize) -> Result<&str, DataError> {
        let record = self.rows.get(row).ok_or(DataError::IndexOutOfBounds {
            index: row,
            len: self.rows.len(),
        })?;
        record
            .values
            .get(column)
            .map(String::as_str)
            .ok_or(DataError::IndexOutOfBounds {
                index: column,
                len: record.values.len(),
            })
    }

    /// 均匀随机、无放回地抽出`floor(len × ratio)`行
    ///
    /// 被抽出的行从本清单中移除（原地修改），剩余行保持原有相对顺序；
    /// 返回的新清单中各行按原清单中的先后排列，并沿用本清单的基准目录。
    pub fn extract_random<R: Rng>(&mut self, ratio: f64, rng: &mut R) -> DataManifest {
        let count = ((self.rows.len() as f64) * ratio).floor() as usize;
        let count = count.min(self.rows.len());
        let mut chosen = vec![false; self.rows.len()];
        for i in index::sample(rng, self.rows.len(), count) {
            chosen[i] = true;
        }

        let mut kept = Vec::with_capacity(self.rows.len() - count);
        let mut extracted = Vec::with_capacity(count);
        for (row, is_chosen) in std::mem::take(&mut self.rows).into_iter().zip(chosen) {
            if is_chosen {
                extracted.push(row);
            } else {
                kept.push(row);
            }
        }
        self.rows = kept;

        DataManifest {
            headers: self.headers.clone(),
            rows: extracted,
            base_dir: self.base_dir.clone(),
        }
    }
}
