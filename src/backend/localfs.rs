// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Directory-backed object store: `root/bucket/key` per object.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::backend::ObjectBackend;
use crate::error::{FsError, Result};

pub struct LocalFsBackend {
    root: PathBuf,
}

impl LocalFsBackend {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    fn path_for(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key.trim_start_matches('/'))
    }
}

fn backend_err(e: std::io::Error) -> FsError {
    FsError::Backend(e.to_string())
}

#[async_trait]
impl ObjectBackend for LocalFsBackend {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        let path = self.path_for(bucket, key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await.map_err(backend_err)?;
        }
        let mut f = fs::File::create(&path).await.map_err(backend_err)?;
        f.write_all(&body).await.map_err(backend_err)?;
        f.flush().await.map_err(backend_err)?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        match fs::read(self.path_for(bucket, key)).await {
            Ok(buf) => Ok(Bytes::from(buf)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FsError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(backend_err(e)),
        }
    }
}
