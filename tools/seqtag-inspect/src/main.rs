//! Seqtag Inspect
//!
//! Loads a character-labeled NER file the way a trainer would and reports
//! what came out: example counts, vocabulary size, decoded samples and
//! batch shapes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use seqtag_core::{DataLoader, EncodingMode, LoaderConfig, NerDataset, IGNORE_LABEL};
use tracing::info;

/// CLI arguments
#[derive(Parser)]
#[command(name = "seqtag-inspect")]
#[command(about = "Load and inspect a character-labeled NER dataset")]
#[command(version)]
struct Cli {
    /// JSON loader configuration
    #[arg(short, long, env = "SEQTAG_CONFIG")]
    config: PathBuf,

    /// Labeled data file
    #[arg(short, long, env = "SEQTAG_DATA")]
    data: PathBuf,

    /// Override the configured sequence length
    #[arg(long)]
    max_length: Option<usize>,

    /// Override the configured batch size
    #[arg(long)]
    batch_size: Option<usize>,

    /// Print this many decoded examples
    #[arg(short, long, default_value_t = 0)]
    show: usize,

    /// Walk one shuffled epoch and report batch shapes
    #[arg(short, long)]
    batches: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = LoaderConfig::from_file(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(max_length) = cli.max_length {
        config = config.with_max_length(max_length);
    }
    if let Some(batch_size) = cli.batch_size {
        config = config.with_batch_size(batch_size);
    }

    let dataset = NerDataset::load(&cli.data, &config)
        .with_context(|| format!("loading dataset {}", cli.data.display()))?;

    println!("examples:   {}", dataset.len());
    println!("mode:       {}", dataset.encoder().mode());
    println!("max_length: {}", dataset.encoder().max_length());
    println!("labels:     {}", dataset.encoder().schema().len());
    if let Some(vocab_size) = dataset.vocab_size() {
        println!("vocab_size: {vocab_size}");
    }

    for (index, example) in dataset.iter().enumerate().take(cli.show) {
        let schema = dataset.encoder().schema();
        let labels: Vec<&str> = example
            .label_ids
            .iter()
            .take_while(|&&id| id != IGNORE_LABEL)
            .map(|&id| schema.label(id).unwrap_or("?"))
            .collect();

        println!();
        println!("[{index}] {}", dataset.sentences()[index]);
        println!("  input_ids: {:?}", example.input_ids);
        if dataset.encoder().mode() != EncodingMode::Subword {
            println!("  decoded:   {}", dataset.encoder().decode(&example.input_ids).join(" "));
        }
        println!("  labels:    {}", labels.join(" "));
    }

    if cli.batches {
        let dataset = Arc::new(dataset);
        let mut loader = DataLoader::new(dataset, config.batch_size, true)?;
        if let Some(seed) = config.shuffle_seed {
            loader = loader.with_seed(seed);
        }

        info!(batches = loader.len(), batch_size = loader.batch_size(), "walking one epoch");
        let mut rows = 0usize;
        for (step, batch) in loader.iter().enumerate() {
            rows += batch.len();
            println!("batch {step}: {} x {}", batch.len(), batch.seq_len());
        }
        info!(rows, "epoch complete");
    }

    Ok(())
}
