//! Queue & Lock Service: two durable FIFO queues (`q:videos`, `q:emails`)
//! with companion DLQs, per-item mutual exclusion with TTL and heartbeat,
//! and the retry/backoff schedule the Job Worker and Notifier Worker both
//! drive against.

pub mod error;
pub mod lock;
pub mod queue;
pub mod retry;

pub use error::{QueueError, QueueResult};
pub use lock::{is_locked, lock_ttl_from_env, LockGuard, LockService, DEFAULT_LOCK_TTL_MS};
pub use queue::{JobQueue, QueueConfig, DLQ_CAP, POP_TIMEOUT_SECS};
pub use retry::{RetryPolicy, RetryTracker, DEFAULT_BACKOFF_SECONDS};

pub use vclip_models::queue::{reasons, DeadLetterEnvelope, JobEnvelope, QueueKind};
