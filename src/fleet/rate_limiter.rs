// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Token bucket shared by every fleet worker.
//!
//! One token is added per `interval`, up to `burst` tokens. Each backend call
//! takes one token. When the bucket is empty the caller reserves a future
//! token (the balance goes negative) and sleeps until it is due, so waiters
//! are released in the order they reserved.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Time to refill a single token.
    pub interval: Duration,
    /// Bucket capacity.
    pub burst: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self { interval: Duration::from_millis(10), burst: 10 }
    }
}

struct Bucket {
    tokens: f64,
    last: Instant,
}

pub struct RateLimiter {
    limit: RateLimit,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// The bucket starts full.
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            bucket: Mutex::new(Bucket { tokens: limit.burst as f64, last: Instant::now() }),
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Block until a token is available.
    pub async fn wait(&self) {
        let delay = self.reserve();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Take one token and return how long the caller has to wait for it.
    fn reserve(&self) -> Duration {
        let now = Instant::now();
        let mut bucket = self.bucket.lock();

        let refill = now.saturating_duration_since(bucket.last).as_secs_f64()
            / self.limit.interval.as_secs_f64();
        bucket.tokens = (bucket.tokens + refill).min(self.limit.burst as f64);
        bucket.last = now;
        bucket.tokens -= 1.0;

        if bucket.tokens >= 0.0 {
            Duration::ZERO
        } else {
            self.limit.interval.mul_f64(-bucket.tokens)
        }
    }
}
