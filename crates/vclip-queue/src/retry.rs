//! Per-item retry counter and backoff schedule.
//!
//! `attempts:<kind>:<id>` tracks how many times an item has failed. On
//! exception the worker increments the counter, sleeps for
//! `backoff[attempts-1]`, then re-enqueues. Once `attempts` exceeds the
//! schedule's length, the item goes to the DLQ and the counter is reset.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use vclip_models::queue::QueueKind;

use crate::error::QueueResult;

/// Default backoff schedule in seconds, overridable via
/// `WORKER_BACKOFF_SECONDS` (csv ints).
pub const DEFAULT_BACKOFF_SECONDS: [u64; 3] = [30, 120, 300];

fn attempts_key(kind: QueueKind, id: &str) -> String {
    format!("attempts:{}:{}", kind.lock_kind(), id)
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub backoff_seconds: Vec<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff_seconds: DEFAULT_BACKOFF_SECONDS.to_vec(),
        }
    }
}

impl RetryPolicy {
    pub fn from_env() -> Self {
        let backoff_seconds = std::env::var("WORKER_BACKOFF_SECONDS")
            .ok()
            .map(|csv| {
                csv.split(',')
                    .filter_map(|s| s.trim().parse::<u64>().ok())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKOFF_SECONDS.to_vec());
        Self { backoff_seconds }
    }

    /// Backoff duration for the given (1-based) attempt count, or `None`
    /// if the schedule is exhausted and the item belongs in the DLQ.
    pub fn backoff_for(&self, attempts: u32) -> Option<u64> {
        self.backoff_seconds.get((attempts - 1) as usize).copied()
    }

    pub fn is_exhausted(&self, attempts: u32) -> bool {
        attempts as usize > self.backoff_seconds.len()
    }
}

/// TTL applied to an `attempts:*` counter after each increment, so a
/// counter left behind by an item that never returns (crash, DLQ without
/// cleanup) does not live forever.
const ATTEMPTS_KEY_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Clone)]
pub struct RetryTracker {
    conn: ConnectionManager,
}

impl RetryTracker {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Increment and return the new attempt count for this item. Re-arms
    /// an expiry on the counter key so abandoned counters do not leak.
    pub async fn increment(&self, kind: QueueKind, id: &str) -> QueueResult<u32> {
        let mut conn = self.conn.clone();
        let key = attempts_key(kind, id);
        let n: i64 = conn.incr(&key, 1).await?;
        conn.expire::<_, ()>(&key, ATTEMPTS_KEY_TTL_SECS).await?;
        Ok(n as u32)
    }

    /// Reset the attempt counter, called once an item completes
    /// successfully.
    pub async fn reset(&self, kind: QueueKind, id: &str) -> QueueResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(attempts_key(kind, id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_backoff_matches_spec() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Some(30));
        assert_eq!(policy.backoff_for(2), Some(120));
        assert_eq!(policy.backoff_for(3), Some(300));
        assert_eq!(policy.backoff_for(4), None);
        assert!(policy.is_exhausted(4));
        assert!(!policy.is_exhausted(3));
    }
}
