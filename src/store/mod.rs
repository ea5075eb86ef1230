// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Large objects stored as numbered part objects.
//!
//! An object written under `key` is laid out as independent backend objects
//! `key/0`, `key/1`, … `key/(N-1)`. Every part except the last holds exactly
//! `part_file_bytes` bytes. No manifest is stored: readers discover the end
//! of an object by the first part that does not exist, so a missing middle
//! part looks the same as end-of-object.

mod reader;
mod writer;

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::{FsError, Result};
use crate::fleet::Fleet;

pub use reader::PartStream;

pub struct PartStore {
    fleet: Arc<Fleet>,
    bucket: String,
    part_file_bytes: u64,
    max_concurrent_reads: usize,
}

impl PartStore {
    pub fn new(
        fleet: Arc<Fleet>,
        bucket: impl Into<String>,
        part_file_bytes: u64,
        max_concurrent_reads: usize,
    ) -> Result<Self> {
        if part_file_bytes == 0 {
            return Err(FsError::Config("part_file_bytes must be > 0".into()));
        }
        if max_concurrent_reads == 0 {
            return Err(FsError::Config("max_concurrent_reads must be > 0".into()));
        }
        let bucket = bucket.into();
        let limit = fleet.rate_limit();
        info!(
            bucket = %bucket,
            part_file_bytes,
            max_concurrent_reads,
            workers = fleet.worker_count(),
            rate_interval_ms = limit.interval.as_millis() as u64,
            rate_burst = limit.burst,
            "Part store ready"
        );

        Ok(Self {
            fleet,
            bucket,
            part_file_bytes,
            max_concurrent_reads,
        })
    }

    /// Connect the configured backend, start a fleet and wrap it.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let fleet = Arc::new(Fleet::connect(config).await?);

        info!(
            base_dir = ?config.filesystem.base_dir,
            backend = ?config.filesystem.backend,
            region = config.s3.region,
            endpoint = ?config.s3.endpoint,
            "Backend connected"
        );

        Self::new(
            fleet,
            config.s3.bucket.clone(),
            config.filesystem.part_file_bytes,
            config.s3.max_concurrent_reads,
        )
    }

    pub fn fleet(&self) -> &Arc<Fleet> {
        &self.fleet
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn part_file_bytes(&self) -> u64 {
        self.part_file_bytes
    }

    pub fn max_concurrent_reads(&self) -> usize {
        self.max_concurrent_reads
    }
}
