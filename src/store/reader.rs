// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Ordered reconstruction of a part-split object.
//!
//! ```text
//!   window (max_concurrent_reads)        fleet
//!  ┌──────┬──────┬──────┬──────┐     ┌──────────┐
//!  │ p[i] │p[i+1]│p[i+2]│p[i+3]│ ←── │ workers  │  parts finish in any order
//!  └──┬───┴──────┴──────┴──────┘     └──────────┘
//!     │ await front only
//!     ▼
//!  yield bytes of part i, submit part i+4, repeat
//! ```
//!
//! Reads for the next `max_concurrent_reads` parts are always outstanding,
//! but only the oldest one is awaited, so bytes come out strictly in part
//! order whatever order the backend answers in.

use std::collections::VecDeque;
use std::pin::Pin;

use async_stream::stream;
use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::error::Result;
use crate::fleet::PendingRead;
use crate::store::PartStore;

/// Bytes of an object, one item per part, in part order.
///
/// The stream ends after the last part. A failed part read is yielded as
/// an `Err` item and ends the stream. Dropping the stream early leaves
/// already-issued reads to finish in the fleet; their results are discarded.
pub type PartStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

impl PartStore {
    /// Open `src` for reading. Nothing is requested until the stream is
    /// first polled.
    pub fn read(&self, src: &str) -> PartStream {
        let fleet = self.fleet.clone();
        let bucket = self.bucket.clone();
        let src = src.to_string();
        let window = self.max_concurrent_reads;

        Box::pin(stream! {
            let mut in_flight: VecDeque<PendingRead> = VecDeque::with_capacity(window);
            let mut next_index = 0;
            while in_flight.len() < window {
                in_flight.push_back(fleet.submit_read(&bucket, &src, next_index).await);
                next_index += 1;
            }

            while let Some(pending) = in_flight.pop_front() {
                let index = pending.index();
                match pending.wait().await {
                    Ok(data) => {
                        in_flight.push_back(fleet.submit_read(&bucket, &src, next_index).await);
                        next_index += 1;
                        yield Ok(data);
                    }
                    Err(e) if e.is_not_found() => {
                        debug!(bucket, src, parts = index, "End of object");
                        break;
                    }
                    Err(e) => {
                        warn!(bucket, src, part = index, error = %e, "Part read failed");
                        yield Err(e);
                        break;
                    }
                }
            }
        })
    }

    /// Copy the whole of `src` into `sink` and flush it. Returns the number
    /// of bytes copied.
    pub async fn read_to<W>(&self, src: &str, mut sink: W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut parts = self.read(src);
        let mut total = 0u64;
        while let Some(chunk) = parts.next().await {
            let chunk = chunk?;
            sink.write_all(&chunk).await?;
            total += chunk.len() as u64;
        }
        sink.flush().await?;
        Ok(total)
    }
}
