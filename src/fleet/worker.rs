// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Fleet worker.
//!
//! Each `Worker` task:
//!  1. Waits on the shared write queue, the shared read queue and the close
//!     signal, with no priority between them.
//!  2. Takes a rate-limit token before every backend call.
//!  3. Sends the backend result, unmodified, to the request's reply channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::ObjectBackend;
use crate::fleet::rate_limiter::RateLimiter;
use crate::fleet::request::{ReadRequest, WriteRequest};

/// Receiving end of a request queue, shared by all workers.
pub(crate) type SharedQueue<T> = Arc<Mutex<mpsc::Receiver<T>>>;

pub(crate) struct Worker {
    pub id: usize,
    pub backend: Arc<dyn ObjectBackend>,
    pub limiter: Arc<RateLimiter>,
    pub writes: SharedQueue<WriteRequest>,
    pub reads: SharedQueue<ReadRequest>,
    pub close: watch::Receiver<bool>,
}

impl Worker {
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(mut self) {
        debug!(worker = self.id, "Worker started");

        loop {
            // Close may have been raised while a request was being serviced.
            if *self.close.borrow() {
                break;
            }
            tokio::select! {
                req = next(&self.writes) => match req {
                    Some(req) => self.handle_write(req).await,
                    None => break,
                },
                req = next(&self.reads) => match req {
                    Some(req) => self.handle_read(req).await,
                    None => break,
                },
                // Err means the fleet itself was dropped.
                _ = self.close.changed() => break,
            }
        }

        debug!(worker = self.id, "Worker stopped");
    }

    async fn handle_write(&self, req: WriteRequest) {
        self.limiter.wait().await;

        let bytes = req.body.len();
        debug!(worker = self.id, bucket = req.bucket, key = req.key, bytes, "Starting put");
        let result = self.backend.put_object(&req.bucket, &req.key, req.body).await;

        match &result {
            Ok(()) => info!(bucket = req.bucket, key = req.key, bytes, "Completed put"),
            Err(e) => warn!(bucket = req.bucket, key = req.key, error = %e, "Put failed"),
        }
        // The submitter may have stopped waiting.
        let _ = req.reply.send(result);
    }

    async fn handle_read(&self, req: ReadRequest) {
        self.limiter.wait().await;

        let result = self.backend.get_object(&req.bucket, &req.key).await;

        match &result {
            Ok(data) => info!(bucket = req.bucket, key = req.key, bytes = data.len(), "Read"),
            Err(e) if e.is_not_found() => {
                debug!(bucket = req.bucket, key = req.key, "No such key")
            }
            Err(e) => warn!(bucket = req.bucket, key = req.key, error = %e, "Get failed"),
        }
        let _ = req.reply.send(result);
    }
}

async fn next<T>(queue: &SharedQueue<T>) -> Option<T> {
    queue.lock().await.recv().await
}
