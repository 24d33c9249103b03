//! Token bucket rate limiter for the producer API
//!
//! Lock-free: bucket level and refill timestamp share one `AtomicU64` and are
//! updated with a compare-and-swap loop.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;

/// Fixed-point scale so partial tokens accumulate between requests
const MILLI: u64 = 1000;

/// Largest bucket whose milli-token level fits the upper 32 bits
pub const MAX_BURST: u32 = u32::MAX / MILLI as u32;

pub struct RateLimiter {
    // Upper 32 bits: milli-tokens available. Lower 32 bits: ms since `epoch`.
    bucket: AtomicU64,
    epoch: Instant,
    capacity: u32,
    refill_per_sec: u32,
}

fn pack(milli_tokens: u64, at_ms: u64) -> u64 {
    (milli_tokens << 32) | (at_ms & 0xFFFF_FFFF)
}

fn unpack(packed: u64) -> (u64, u64) {
    (packed >> 32, packed & 0xFFFF_FFFF)
}

impl RateLimiter {
    /// Bucket holding `capacity` requests, refilled at `refill_per_sec`
    ///
    /// `capacity` is clamped to [`MAX_BURST`].
    pub fn new(capacity: u32, refill_per_sec: u32) -> Self {
        let capacity = capacity.min(MAX_BURST);
        Self {
            bucket: AtomicU64::new(pack(capacity as u64 * MILLI, 0)),
            epoch: Instant::now(),
            capacity,
            refill_per_sec,
        }
    }

    /// Take one token; false when the caller must be throttled
    pub fn try_acquire(&self) -> bool {
        let max = self.capacity as u64 * MILLI;

        loop {
            let current = self.bucket.load(Ordering::Acquire);
            let (level, last_ms) = unpack(current);

            let now_ms = (self.epoch.elapsed().as_millis() as u64) & 0xFFFF_FFFF;
            // ms × tokens/s = milli-tokens
            let refill = now_ms.wrapping_sub(last_ms) & 0xFFFF_FFFF;
            let level = level
                .saturating_add(refill.saturating_mul(self.refill_per_sec as u64))
                .min(max);

            let (next, granted) = if level >= MILLI {
                (pack(level - MILLI, now_ms), true)
            } else {
                (pack(level, now_ms), false)
            };

            if self
                .bucket
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return granted;
            }
        }
    }

    /// Whole tokens currently available (ignores pending refill)
    pub fn available(&self) -> u32 {
        (unpack(self.bucket.load(Ordering::Acquire)).0 / MILLI) as u32
    }
}
