// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::{FsError, Result};
use crate::fleet::RateLimit;

pub const DEFAULT_PART_FILE_BYTES: u64 = 64_000_000;
pub const DEFAULT_BASE_DIR: &str = "/tmp/s3fs";
pub const DEFAULT_CONFIG_NAME: &str = ".s3fs.toml";

/// Written to `$HOME/.s3fs.toml` the first time the CLI runs without one.
pub const DEFAULT_CONFIG: &str = r#"# s3fs default config
[s3]
bucket = "s3fs-parts"
region = "us-east-1"
workers = 20
max_concurrent_reads = 20

[filesystem]
base_dir = "$HOME/.s3fs/"
part_file_bytes = 64000000
"#;

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Object-store connection and fleet sizing.
    #[serde(default)]
    pub s3: S3Config,
    /// Local layout and part sizing.
    #[serde(default)]
    pub filesystem: FileSystemConfig,
}

/// Object-store and fleet parameters.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct S3Config {
    /// Bucket every part object is written to.
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Number of fleet workers; also the capacity of each request queue.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Size of the read-ahead window used by chunked reads.
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,
    /// One rate-limit token is added every `rate_interval_ms`.
    #[serde(default = "default_rate_interval_ms")]
    pub rate_interval_ms: u64,
    /// Token bucket capacity.
    #[serde(default = "default_rate_burst")]
    pub rate_burst: u32,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
            workers: default_workers(),
            max_concurrent_reads: default_max_concurrent_reads(),
            rate_interval_ms: default_rate_interval_ms(),
            rate_burst: default_rate_burst(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileSystemConfig {
    /// Base directory. `$HOME` is expanded. Root of the `local` backend.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Size of every part except possibly the last.
    #[serde(default = "default_part_file_bytes")]
    pub part_file_bytes: u64,
    #[serde(default)]
    pub backend: BackendKind,
}

impl Default for FileSystemConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            part_file_bytes: default_part_file_bytes(),
            backend: BackendKind::default(),
        }
    }
}

/// Which object store the fleet workers talk to.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    S3,
    /// Directory tree under `base_dir`.
    Local,
    /// Process-local map; contents vanish on exit.
    Memory,
}

impl FromStr for BackendKind {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(BackendKind::S3),
            "local" => Ok(BackendKind::Local),
            "memory" => Ok(BackendKind::Memory),
            other => Err(FsError::Config(format!("Unknown backend '{other}'"))),
        }
    }
}

fn default_region() -> String { "us-east-1".into() }
fn default_workers() -> usize { 20 }
fn default_max_concurrent_reads() -> usize { 20 }
fn default_rate_interval_ms() -> u64 { 10 }
fn default_rate_burst() -> u32 { 10 }
fn default_base_dir() -> PathBuf { PathBuf::from(DEFAULT_BASE_DIR) }
fn default_part_file_bytes() -> u64 { DEFAULT_PART_FILE_BYTES }

/// Values given explicitly on the command line. `None` keeps the file value.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub base_dir: Option<PathBuf>,
    pub part_file_bytes: Option<u64>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub workers: Option<usize>,
    pub max_concurrent_reads: Option<usize>,
    pub backend: Option<BackendKind>,
}

impl Config {
    /// Resolve the effective configuration for a CLI run.
    ///
    /// With no explicit path, `$HOME/.s3fs.toml` is used and created from
    /// [`DEFAULT_CONFIG`] when missing.
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let home = dirs::home_dir()
                    .ok_or_else(|| FsError::Config("Cannot determine home directory".into()))?;
                let default_path = home.join(DEFAULT_CONFIG_NAME);
                if !default_path.exists() {
                    if let Err(e) = std::fs::write(&default_path, DEFAULT_CONFIG) {
                        warn!(path = ?default_path, error = %e, "Could not create default config");
                    }
                }
                default_path
            }
        };

        let mut config = Self::from_file(&path)?;
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file at `path`. Not validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FsError::Config(format!("Cannot read config file {path:?}: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| FsError::Config(format!("Invalid TOML: {e}")))?;
        config.filesystem.base_dir = expand_home(&config.filesystem.base_dir);
        Ok(config)
    }

    pub fn apply(&mut self, o: ConfigOverrides) {
        if let Some(v) = o.base_dir {
            self.filesystem.base_dir = expand_home(&v);
        }
        if let Some(v) = o.part_file_bytes {
            self.filesystem.part_file_bytes = v;
        }
        if let Some(v) = o.backend {
            self.filesystem.backend = v;
        }
        if let Some(v) = o.bucket {
            self.s3.bucket = v;
        }
        if let Some(v) = o.region {
            self.s3.region = v;
        }
        if let Some(v) = o.endpoint {
            self.s3.endpoint = Some(v);
        }
        if let Some(v) = o.workers {
            self.s3.workers = v;
        }
        if let Some(v) = o.max_concurrent_reads {
            self.s3.max_concurrent_reads = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.s3.bucket.is_empty() {
            return Err(FsError::Config("bucket must be set".into()));
        }
        if self.filesystem.part_file_bytes == 0 {
            return Err(FsError::Config("part_file_bytes must be > 0".into()));
        }
        if self.s3.workers == 0 {
            return Err(FsError::Config("workers must be > 0".into()));
        }
        if self.s3.max_concurrent_reads == 0 {
            return Err(FsError::Config("max_concurrent_reads must be > 0".into()));
        }
        if self.s3.rate_interval_ms == 0 || self.s3.rate_burst == 0 {
            return Err(FsError::Config("rate_interval_ms and rate_burst must be > 0".into()));
        }
        Ok(())
    }

    pub fn rate_limit(&self) -> RateLimit {
        RateLimit {
            interval: Duration::from_millis(self.s3.rate_interval_ms),
            burst: self.s3.rate_burst,
        }
    }
}

/// Replace a leading `$HOME` with the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    match (s.strip_prefix("$HOME"), dirs::home_dir()) {
        (Some(rest), Some(home)) => {
            PathBuf::from(format!("{}{}", home.display(), rest))
        }
        _ => path.to_path_buf(),
    }
}
