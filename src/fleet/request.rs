// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Requests carried on the fleet queues and the handles returned to
//! submitters.
//!
//! Every request owns the sending half of a `oneshot` channel and every
//! handle owns the receiving half, so each result is produced once and
//! consumed once. A request dropped before a worker answers it (fleet shut
//! down) resolves its handle to [`FsError::Cancelled`].

use bytes::Bytes;
use tokio::sync::oneshot;

use crate::error::{FsError, Result};

/// Key of part `index` of the object stored under `key`.
///
/// The joined key is lexically cleaned: repeated slashes collapse, `.`
/// segments vanish and `..` removes the segment before it. An empty `key`
/// yields the bare index.
///
/// `part_key("logs//day1/", 3) == "logs/day1/3"`, `part_key("", 0) == "0"`.
pub fn part_key(key: &str, index: usize) -> String {
    if key.is_empty() {
        return index.to_string();
    }
    clean_key(&format!("{key}/{index}"))
}

fn clean_key(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `..` above the root stays at the root.
                _ if rooted => {}
                _ => segments.push(".."),
            },
            s => segments.push(s),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[derive(Debug)]
pub struct WriteRequest {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub(crate) reply: oneshot::Sender<Result<()>>,
}

#[derive(Debug)]
pub struct ReadRequest {
    pub bucket: String,
    pub key: String,
    pub(crate) reply: oneshot::Sender<Result<Bytes>>,
}

impl WriteRequest {
    pub(crate) fn new(bucket: &str, key: &str, body: Bytes) -> (Self, PendingWrite) {
        let (reply, rx) = oneshot::channel();
        let req = Self { bucket: bucket.to_string(), key: key.to_string(), body, reply };
        (req, PendingWrite { key: key.to_string(), rx })
    }
}

impl ReadRequest {
    pub(crate) fn new(bucket: &str, key: &str, index: usize) -> (Self, PendingRead) {
        let (reply, rx) = oneshot::channel();
        let req = Self { bucket: bucket.to_string(), key: key.to_string(), reply };
        (req, PendingRead { key: key.to_string(), index, rx })
    }
}

/// Outcome of one submitted put.
#[derive(Debug)]
pub struct PendingWrite {
    key: String,
    rx: oneshot::Receiver<Result<()>>,
}

impl PendingWrite {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn wait(self) -> Result<()> {
        self.rx.await.unwrap_or(Err(FsError::Cancelled))
    }
}

/// Outcome of one submitted part get: the part's bytes on success.
#[derive(Debug)]
pub struct PendingRead {
    key: String,
    index: usize,
    rx: oneshot::Receiver<Result<Bytes>>,
}

impl PendingRead {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Part index this read was issued for.
    pub fn index(&self) -> usize {
        self.index
    }

    pub async fn wait(self) -> Result<Bytes> {
        self.rx.await.unwrap_or(Err(FsError::Cancelled))
    }
}
