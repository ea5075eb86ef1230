//! Test backends layered over `MemoryBackend`.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use s3fs::backend::{MemoryBackend, ObjectBackend};
use s3fs::fleet::RateLimit;
use s3fs::{Fleet, FsError, PartStore, Result};

pub const BUCKET: &str = "test-bucket";

/// Limit loose enough to never throttle a test.
pub fn unthrottled() -> RateLimit {
    RateLimit { interval: Duration::from_micros(10), burst: 100_000 }
}

pub fn store_on(
    backend: Arc<dyn ObjectBackend>,
    workers: usize,
    part_file_bytes: u64,
    max_concurrent_reads: usize,
) -> PartStore {
    let fleet = Fleet::new(workers, backend, unthrottled()).expect("fleet");
    PartStore::new(Arc::new(fleet), BUCKET, part_file_bytes, max_concurrent_reads).expect("store")
}

pub async fn read_all(store: &PartStore, key: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    store.read_to(key, &mut out).await?;
    Ok(out)
}

/// Part index encoded as the last path segment of `key`.
pub fn index_of(key: &str) -> usize {
    key.rsplit('/').next().and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// Delays gets so that higher part indices answer first, and records the
/// order in which gets finish.
pub struct ReversedLatency {
    pub inner: MemoryBackend,
    pub step: Duration,
    pub slots: usize,
    pub completed: Mutex<Vec<String>>,
}

impl ReversedLatency {
    pub fn new(step: Duration, slots: usize) -> Self {
        Self { inner: MemoryBackend::new(), step, slots, completed: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl ObjectBackend for ReversedLatency {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        self.inner.put_object(bucket, key, body).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let rank = self.slots.saturating_sub(index_of(key)) as u32;
        tokio::time::sleep(self.step * rank).await;
        let result = self.inner.get_object(bucket, key).await;
        self.completed.lock().push(key.to_string());
        result
    }
}

/// Fails any call whose key is listed.
pub struct Faulty {
    pub inner: MemoryBackend,
    pub fail_puts: Vec<String>,
    pub fail_gets: Vec<String>,
}

impl Faulty {
    pub fn new() -> Self {
        Self { inner: MemoryBackend::new(), fail_puts: Vec::new(), fail_gets: Vec::new() }
    }
}

#[async_trait]
impl ObjectBackend for Faulty {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        if self.fail_puts.iter().any(|k| k == key) {
            return Err(FsError::Backend(format!("injected put failure for {key}")));
        }
        self.inner.put_object(bucket, key, body).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        if self.fail_gets.iter().any(|k| k == key) {
            return Err(FsError::Backend(format!("injected get failure for {key}")));
        }
        self.inner.get_object(bucket, key).await
    }
}

/// Holds every put until `release` is called.
pub struct Gated {
    pub inner: MemoryBackend,
    gate: Semaphore,
    in_flight: AtomicUsize,
}

impl Gated {
    pub fn new() -> Self {
        Self { inner: MemoryBackend::new(), gate: Semaphore::new(0), in_flight: AtomicUsize::new(0) }
    }

    pub fn release(&self) {
        self.gate.add_permits(1 << 20);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Poll until `n` puts are parked at the gate.
    pub async fn wait_for_in_flight(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.in_flight() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("puts never reached the gate");
    }
}

#[async_trait]
impl ObjectBackend for Gated {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.gate.acquire().await.expect("gate closed").forget();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.put_object(bucket, key, body).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.inner.get_object(bucket, key).await
    }
}

/// Records every key that was fetched.
pub struct Recording {
    pub inner: MemoryBackend,
    pub gets: Mutex<Vec<String>>,
}

impl Recording {
    pub fn new() -> Self {
        Self { inner: MemoryBackend::new(), gets: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl ObjectBackend for Recording {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        self.inner.put_object(bucket, key, body).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.gets.lock().push(key.to_string());
        self.inner.get_object(bucket, key).await
    }
}
