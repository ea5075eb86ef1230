// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Object-store backends used by fleet workers.
//!
//! Workers only ever need two operations: put a whole object and get a whole
//! object. A missing key must come back as `FsError::NotFound` so that
//! chunked reads can treat it as end-of-object.

pub mod localfs;
pub mod memory;
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::{BackendKind, Config};
use crate::error::Result;

pub use localfs::LocalFsBackend;
pub use memory::MemoryBackend;
pub use s3::S3Backend;

#[async_trait]
pub trait ObjectBackend: Send + Sync {
    /// Store `body` under `bucket/key`, replacing any existing object.
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()>;

    /// Fetch the whole object. Missing keys yield `FsError::NotFound`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;
}

/// Build the backend selected by `config.filesystem.backend`.
pub async fn connect(config: &Config) -> Result<Arc<dyn ObjectBackend>> {
    let backend: Arc<dyn ObjectBackend> = match config.filesystem.backend {
        BackendKind::S3 => Arc::new(
            S3Backend::connect(&config.s3.region, config.s3.endpoint.as_deref()).await?,
        ),
        BackendKind::Local => Arc::new(LocalFsBackend::new(&config.filesystem.base_dir)),
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
    };
    Ok(backend)
}
