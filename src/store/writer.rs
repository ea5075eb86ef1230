// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{info, warn};

use crate::error::Result;
use crate::fleet::{part_key, PendingWrite};
use crate::store::PartStore;

impl PartStore {
    /// Split `data` into parts and store them under `dest/0`, `dest/1`, …
    ///
    /// Returns the number of parts written; an empty source writes none.
    /// Parts are submitted in order as soon as they are read, and the call
    /// returns once every submitted part has settled. If any part failed,
    /// the error of the lowest failing index is returned. Parts that did
    /// succeed stay in the backend.
    ///
    /// A local read error returns at once; parts already queued still
    /// complete in the background.
    pub async fn write<R>(&self, dest: &str, mut data: R) -> Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        let mut pending: Vec<PendingWrite> = Vec::new();

        loop {
            let mut buf = Vec::with_capacity(self.part_file_bytes as usize);
            let n = (&mut data).take(self.part_file_bytes).read_to_end(&mut buf).await?;

            if n > 0 {
                let key = part_key(dest, pending.len());
                pending.push(self.fleet.submit_write(&self.bucket, &key, Bytes::from(buf)).await);
            }
            // A short part means the source is exhausted.
            if (n as u64) < self.part_file_bytes {
                break;
            }
        }

        let parts = pending.len();
        let mut first_err = None;
        for handle in pending {
            let key = handle.key().to_string();
            if let Err(e) = handle.wait().await {
                warn!(bucket = self.bucket, key, error = %e, "Part write failed");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => {
                info!(bucket = self.bucket, dest, parts, "Write complete");
                Ok(parts)
            }
        }
    }
}
