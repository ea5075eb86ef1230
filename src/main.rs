// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! s3fs: large objects on S3 as numbered part files
//!
//! Usage:
//!   s3fs write logs/2026-10-19 -f app.log    # split a file into parts
//!   cat app.log | s3fs write logs/today      # or from stdin
//!   s3fs read logs/2026-10-19 > app.log      # reassemble to stdout
//!   s3fs -b other-bucket read logs/today -f copy.log

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use s3fs::config::{BackendKind, Config, ConfigOverrides};
use s3fs::PartStore;

#[derive(Parser)]
#[command(name = "s3fs", about = "Read and write large objects as S3 part files", version)]
struct Cli {
    /// Config file (default is $HOME/.s3fs.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base directory; root of the `local` backend.
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
    /// Size of individual part files (in bytes).
    #[arg(long, global = true)]
    part_file_bytes: Option<u64>,
    /// S3 bucket holding the part files.
    #[arg(short, long, global = true)]
    bucket: Option<String>,
    /// S3 region.
    #[arg(short, long, global = true)]
    region: Option<String>,
    /// Custom S3-compatible endpoint URL.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Number of S3 connection workers.
    #[arg(short, long, global = true)]
    workers: Option<usize>,
    /// Maximum number of parts fetched ahead while reading.
    #[arg(long, global = true)]
    max_concurrent_reads: Option<usize>,
    /// Object store to use: s3, local or memory.
    #[arg(long, global = true)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write data to an object, split into part files.
    Write {
        /// Destination object key.
        path: String,
        /// Source file to be written (otherwise read from stdin).
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Read an object back by reassembling its part files.
    Read {
        /// Source object key.
        path: String,
        /// Local file to write output to (otherwise output to stdout).
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_dir: self.base_dir.clone(),
            part_file_bytes: self.part_file_bytes,
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            workers: self.workers,
            max_concurrent_reads: self.max_concurrent_reads,
            backend: self.backend,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout may carry object data.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref(), cli.overrides())
        .context("Failed to load config")?;
    let store = PartStore::from_config(&config)
        .await
        .context("Failed to initialize s3fs")?;

    let result = match cli.command {
        Command::Write { path, file } => run_write(&store, &path, file).await,
        Command::Read { path, file } => run_read(&store, &path, file).await,
    };

    store.fleet().shutdown().await;
    result
}

async fn run_write(store: &PartStore, dest: &str, file: Option<PathBuf>) -> anyhow::Result<()> {
    let parts = match file {
        Some(path) => {
            let src = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Error opening '{}'", path.display()))?;
            store.write(dest, src).await
        }
        None => store.write(dest, tokio::io::stdin()).await,
    }
    .with_context(|| format!("Error writing '{dest}'"))?;

    info!(dest, parts, "Write finished");
    Ok(())
}

async fn run_read(store: &PartStore, src: &str, file: Option<PathBuf>) -> anyhow::Result<()> {
    let bytes = match file {
        Some(path) => {
            let sink = tokio::fs::File::create(&path)
                .await
                .with_context(|| format!("Error opening '{}'", path.display()))?;
            store.read_to(src, sink).await
        }
        None => store.read_to(src, tokio::io::stdout()).await,
    }
    .with_context(|| format!("Error reading '{src}'"))?;

    info!(src, bytes, "Read finished");
    Ok(())
}
