// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Worker fleet: every backend call goes through here.
//!
//! ```text
//! PartStore::write ─┐  write queue (cap = N)  ┌→ worker 0 ─┐
//!                   ├───────────────────────→─┼→ worker 1 ─┼─ RateLimiter ─→ backend
//! PartStore::read  ─┘  read queue  (cap = N)  └→ worker N ─┘
//!                            ▲                        │
//!                            └──── oneshot reply ─────┘
//! ```
//!
//! Both queues are bounded at the worker count, so a submitter waits once
//! `N` requests are queued on top of the `N` being serviced.

pub mod rate_limiter;
pub mod request;
mod worker;

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::backend::{self, ObjectBackend};
use crate::config::Config;
use crate::error::{FsError, Result};

pub use rate_limiter::{RateLimit, RateLimiter};
pub use request::{part_key, PendingRead, PendingWrite, ReadRequest, WriteRequest};
use worker::Worker;

pub struct Fleet {
    write_tx: mpsc::Sender<WriteRequest>,
    read_tx: mpsc::Sender<ReadRequest>,
    close_tx: watch::Sender<bool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    limiter: Arc<RateLimiter>,
    size: usize,
}

impl Fleet {
    /// Spawn `workers` worker tasks sharing one rate limiter and two request
    /// queues. Must be called from within a tokio runtime.
    pub fn new(workers: usize, backend: Arc<dyn ObjectBackend>, limit: RateLimit) -> Result<Self> {
        if workers == 0 {
            return Err(FsError::Config("workers must be > 0".into()));
        }

        let limiter = Arc::new(RateLimiter::new(limit));
        let (write_tx, write_rx) = mpsc::channel(workers);
        let (read_tx, read_rx) = mpsc::channel(workers);
        let (close_tx, close_rx) = watch::channel(false);
        let writes = Arc::new(tokio::sync::Mutex::new(write_rx));
        let reads = Arc::new(tokio::sync::Mutex::new(read_rx));

        let handles = (0..workers)
            .map(|id| {
                Worker {
                    id,
                    backend: backend.clone(),
                    limiter: limiter.clone(),
                    writes: writes.clone(),
                    reads: reads.clone(),
                    close: close_rx.clone(),
                }
                .spawn()
            })
            .collect();

        info!(
            workers,
            rate_interval_ms = limit.interval.as_millis() as u64,
            rate_burst = limit.burst,
            "Fleet started"
        );

        Ok(Self {
            write_tx,
            read_tx,
            close_tx,
            workers: Mutex::new(handles),
            limiter,
            size: workers,
        })
    }

    /// Build the configured backend and start a fleet on it.
    pub async fn connect(config: &Config) -> Result<Self> {
        let backend = backend::connect(config).await?;
        Self::new(config.s3.workers, backend, config.rate_limit())
    }

    /// Queue a put of `body` under `bucket/key`.
    ///
    /// Waits only while the write queue is full; the returned handle
    /// resolves once a worker has finished the put.
    pub async fn submit_write(&self, bucket: &str, key: &str, body: Bytes) -> PendingWrite {
        let (req, pending) = WriteRequest::new(bucket, key, body);
        // On failure the request is dropped and `pending` yields Cancelled.
        let _ = self.write_tx.send(req).await;
        pending
    }

    /// Queue a get of part `index` of the object under `bucket/key`.
    pub async fn submit_read(&self, bucket: &str, key: &str, index: usize) -> PendingRead {
        let (req, pending) = ReadRequest::new(bucket, &part_key(key, index), index);
        let _ = self.read_tx.send(req).await;
        pending
    }

    pub fn worker_count(&self) -> usize {
        self.size
    }

    pub fn rate_limit(&self) -> RateLimit {
        self.limiter.limit()
    }

    /// Stop all workers and wait for them to exit.
    ///
    /// Requests already being serviced complete normally. Requests still
    /// queued, and any submitted afterwards, resolve to `Cancelled`.
    pub async fn shutdown(&self) {
        self.close_tx.send_replace(true);

        let handles = std::mem::take(&mut *self.workers.lock());
        if handles.is_empty() {
            return;
        }
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Worker task failed");
            }
        }
        info!(workers = self.size, "Fleet stopped");
    }
}
