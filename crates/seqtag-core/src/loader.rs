//! # Batch Loader
//!
//! Groups dataset examples into batches for a trainer. Each call to
//! [`DataLoader::iter`] starts a new epoch; with shuffling enabled the order
//! is redrawn every epoch. The dataset itself is only ever read.

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use candle_core::{Device, Tensor};
use oorandom::Rand64;

use crate::config::LoaderConfig;
use crate::dataset::NerDataset;
use crate::error::{Result, SeqtagError};

/// Stacked rows of a batch, `[batch_size, max_length]` each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Dataset index of each row.
    pub indices: Vec<usize>,
    pub input_ids: Vec<Vec<u32>>,
    pub label_ids: Vec<Vec<i64>>,
}

impl Batch {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Row length, 0 for an empty batch.
    pub fn seq_len(&self) -> usize {
        self.input_ids.first().map_or(0, Vec::len)
    }

    /// Convert to `(input_ids: u32, label_ids: i64)` tensors of shape
    /// `[batch_size, max_length]`.
    pub fn to_tensors(&self, device: &Device) -> Result<(Tensor, Tensor)> {
        let shape = (self.len(), self.seq_len());

        let inputs: Vec<u32> = self.input_ids.iter().flatten().copied().collect();
        let labels: Vec<i64> = self.label_ids.iter().flatten().copied().collect();

        let inputs = Tensor::from_vec(inputs, shape, device)
            .map_err(|e| SeqtagError::Candle(e.to_string()))?;
        let labels = Tensor::from_vec(labels, shape, device)
            .map_err(|e| SeqtagError::Candle(e.to_string()))?;

        Ok((inputs, labels))
    }
}

/// Batch iterator factory over a shared dataset.
pub struct DataLoader {
    dataset: Arc<NerDataset>,
    batch_size: usize,
    shuffle: bool,
    rng: Rand64,
}

impl DataLoader {
    /// Create a loader. Without [`DataLoader::with_seed`] the shuffle seed
    /// comes from the clock.
    pub fn new(dataset: Arc<NerDataset>, batch_size: usize, shuffle: bool) -> Result<Self> {
        if batch_size == 0 {
            return Err(SeqtagError::Config("batch_size must be positive".into()));
        }

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        Ok(Self {
            dataset,
            batch_size,
            shuffle,
            rng: Rand64::new(seed),
        })
    }

    /// Make the shuffled order reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rand64::new(u128::from(seed));
        self
    }

    pub fn dataset(&self) -> &Arc<NerDataset> {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches per epoch; the last one may be short.
    pub fn len(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Start an epoch.
    pub fn iter(&mut self) -> Batches<'_> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            // Fisher-Yates
            for i in (1..order.len()).rev() {
                let j = self.rng.rand_range(0..(i as u64 + 1)) as usize;
                order.swap(i, j);
            }
        }

        Batches {
            dataset: &self.dataset,
            order,
            batch_size: self.batch_size,
            cursor: 0,
        }
    }
}

/// One epoch of batches.
pub struct Batches<'a> {
    dataset: &'a NerDataset,
    order: Vec<usize>,
    batch_size: usize,
    cursor: usize,
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.order.len() {
            return None;
        }

        let end = (self.cursor + self.batch_size).min(self.order.len());
        let indices = self.order[self.cursor..end].to_vec();
        self.cursor = end;

        let (input_ids, label_ids) = indices
            .iter()
            .map(|&i| {
                let example = &self.dataset[i];
                (example.input_ids.clone(), example.label_ids.clone())
            })
            .unzip();

        Some(Batch {
            indices,
            input_ids,
            label_ids,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.cursor).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches<'_> {}

/// Load `path` as described by `config` and wrap it in a loader using the
/// configured batch size and seed.
pub fn load_data<P: AsRef<Path>>(path: P, config: &LoaderConfig, shuffle: bool) -> Result<DataLoader> {
    let dataset = NerDataset::load(path, config)?;
    let loader = DataLoader::new(Arc::new(dataset), config.batch_size, shuffle)?;
    Ok(match config.shuffle_seed {
        Some(seed) => loader.with_seed(seed),
        None => loader,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::SequenceEncoder;
    use crate::schema::LabelSchema;
    use crate::vocab::Vocabulary;

    fn dataset(examples: usize) -> Arc<NerDataset> {
        let vocab = Vocabulary::from_lines(["[UNK]", "我", "爱"]).unwrap();
        let schema = LabelSchema::from_json(r#"{"O": 0, "B-LOC": 1}"#).unwrap();
        let encoder = SequenceEncoder::chars(vocab, schema, 4);

        let text = (0..examples)
            .map(|i| if i % 2 == 0 { "我 O\n" } else { "爱 B-LOC\n爱 O\n" })
            .collect::<Vec<_>>()
            .join("\n");
        Arc::new(NerDataset::from_text(&text, encoder).unwrap())
    }

    #[test]
    fn test_sequential_batches() {
        let mut loader = DataLoader::new(dataset(5), 2, false).unwrap();
        assert_eq!(loader.len(), 3);

        let batches: Vec<Batch> = loader.iter().collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].indices, vec![0, 1]);
        assert_eq!(batches[2].indices, vec![4]);
        assert_eq!(batches[0].input_ids[1], vec![3, 3, 0, 0]);
        assert_eq!(batches[0].label_ids[1], vec![1, 0, -1, -1]);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut loader = DataLoader::new(dataset(9), 4, true).unwrap().with_seed(7);
        let mut seen: Vec<usize> = loader.iter().flat_map(|b| b.indices).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let data = dataset(20);
        let mut a = DataLoader::new(Arc::clone(&data), 3, true).unwrap().with_seed(42);
        let mut b = DataLoader::new(data, 3, true).unwrap().with_seed(42);

        let first: Vec<Batch> = a.iter().collect();
        let second: Vec<Batch> = b.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iteration_restarts() {
        let mut loader = DataLoader::new(dataset(6), 4, true).unwrap().with_seed(1);
        assert_eq!(loader.iter().count(), 2);
        assert_eq!(loader.iter().count(), 2);
        assert_eq!(loader.iter().len(), 2);
    }

    #[test]
    fn test_empty_dataset_yields_no_batches() {
        let mut loader = DataLoader::new(dataset(0), 4, true).unwrap();
        assert!(loader.is_empty());
        assert_eq!(loader.len(), 0);
        assert!(loader.iter().next().is_none());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(DataLoader::new(dataset(2), 0, false).is_err());
    }

    #[test]
    fn test_to_tensors() {
        let mut loader = DataLoader::new(dataset(3), 3, false).unwrap();
        let batch = loader.iter().next().unwrap();
        let (inputs, labels) = batch.to_tensors(&Device::Cpu).unwrap();

        assert_eq!(inputs.dims(), &[3, 4]);
        assert_eq!(labels.dims(), &[3, 4]);
        let rows: Vec<Vec<i64>> = labels.to_vec2().unwrap();
        assert_eq!(rows[0], vec![0, -1, -1, -1]);
    }

    #[test]
    fn test_load_data() {
        let dir = tempfile::tempdir().unwrap();
        let vocab_path = dir.path().join("chars.txt");
        let schema_path = dir.path().join("schema.json");
        let data_path = dir.path().join("train.txt");
        std::fs::write(&vocab_path, "[UNK]\n我\n爱\n").unwrap();
        std::fs::write(&schema_path, r#"{"O": 0}"#).unwrap();
        std::fs::write(&data_path, "我 O\n\n爱 O\n\n我 O\n").unwrap();

        let config = LoaderConfig::new()
            .with_vocab_path(&vocab_path)
            .with_schema_path(&schema_path)
            .with_max_length(2)
            .with_batch_size(2)
            .with_shuffle_seed(3);
        let mut loader = load_data(&data_path, &config, true).unwrap();

        assert_eq!(loader.dataset().len(), 3);
        assert_eq!(loader.batch_size(), 2);
        let sizes: Vec<usize> = loader.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
    }
}
