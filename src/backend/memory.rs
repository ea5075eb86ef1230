// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::backend::ObjectBackend;
use crate::error::{FsError, Result};

/// In-process object store keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryBackend {
    objects: RwLock<HashMap<(String, String), Bytes>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects.read().get(&(bucket.to_string(), key.to_string())).cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.get(bucket, key).is_some()
    }

    /// Delete an object. Returns whether it existed.
    pub fn remove(&self, bucket: &str, key: &str) -> bool {
        self.objects.write().remove(&(bucket.to_string(), key.to_string())).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl ObjectBackend for MemoryBackend {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        self.objects.write().insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.get(bucket, key).ok_or_else(|| FsError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}
