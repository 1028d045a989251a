//! Per-item mutual exclusion: `lock:<kind>:<id>` set with `NX` and a TTL.
//! While the holder works, a heartbeat task re-arms the TTL at roughly
//! `ttl/3` until either the work completes or a stop signal fires.
//!
//! Acquisition failure is not an error: the caller logs `lock_skip` and
//! returns, relying on the envelope's eventual retry (or DLQ) to make
//! progress, per the Queue & Lock Service design.

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;
use vclip_models::queue::QueueKind;

use crate::error::QueueResult;

/// Default lock TTL: 15 minutes, overridable via `WORKER_LOCK_TTL_MS`.
pub const DEFAULT_LOCK_TTL_MS: u64 = 15 * 60 * 1000;

/// Read the lock TTL from `WORKER_LOCK_TTL_MS`, falling back to
/// [`DEFAULT_LOCK_TTL_MS`].
pub fn lock_ttl_from_env() -> u64 {
    std::env::var("WORKER_LOCK_TTL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LOCK_TTL_MS)
}

fn lock_key(kind: QueueKind, id: &str) -> String {
    format!("lock:{}:{}", kind.lock_kind(), id)
}

#[derive(Clone)]
pub struct LockService {
    conn: ConnectionManager,
    ttl_ms: u64,
}

impl LockService {
    pub fn new(conn: ConnectionManager, ttl_ms: u64) -> Self {
        Self { conn, ttl_ms }
    }

    /// Attempt to acquire the lock for `(kind, id)`. Returns `None` on a
    /// miss (lock already held by someone else); the value stored is an
    /// opaque owner token so only the acquirer can release it.
    pub async fn try_acquire(&self, kind: QueueKind, id: &str) -> QueueResult<Option<LockGuard>> {
        let key = lock_key(kind, id);
        let owner = Uuid::new_v4().to_string();
        let mut conn = self.conn.clone();
        let acquired: bool = redis::cmd("SET")
            .arg(&key)
            .arg(&owner)
            .arg("NX")
            .arg("PX")
            .arg(self.ttl_ms)
            .query_async::<Option<String>>(&mut conn)
            .await?
            .is_some();

        if !acquired {
            return Ok(None);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let heartbeat = spawn_heartbeat(self.conn.clone(), key.clone(), owner.clone(), self.ttl_ms, stop_rx);

        Ok(Some(LockGuard {
            conn: self.conn.clone(),
            key,
            owner,
            stop_tx: Some(stop_tx),
            heartbeat: Some(heartbeat),
        }))
    }
}

/// An acquired lock. Dropping it stops the heartbeat task; callers should
/// `release().await` explicitly so the key is deleted promptly rather than
/// left to expire.
pub struct LockGuard {
    conn: ConnectionManager,
    key: String,
    owner: String,
    stop_tx: Option<watch::Sender<bool>>,
    heartbeat: Option<JoinHandle<()>>,
}

impl LockGuard {
    /// Release the lock, but only if we still own it (atomic
    /// check-and-delete via a Lua script — a heartbeat race must never
    /// delete a lock some other owner has since acquired after our TTL
    /// lapsed).
    pub async fn release(mut self) -> QueueResult<()> {
        self.stop_heartbeat().await;
        release_if_owner(&mut self.conn, &self.key, &self.owner).await
    }

    async fn stop_heartbeat(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(true);
        }
        if let Some(handle) = self.heartbeat.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(true);
        }
    }
}

const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

const HEARTBEAT_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("PEXPIRE", KEYS[1], ARGV[2])
else
    return 0
end
"#;

async fn release_if_owner(conn: &mut ConnectionManager, key: &str, owner: &str) -> QueueResult<()> {
    let script = redis::Script::new(RELEASE_SCRIPT);
    script.key(key).arg(owner).invoke_async::<i64>(conn).await?;
    Ok(())
}

fn spawn_heartbeat(
    mut conn: ConnectionManager,
    key: String,
    owner: String,
    ttl_ms: u64,
    mut stop_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = Duration::from_millis((ttl_ms / 3).max(1000));
    tokio::spawn(async move {
        let script = redis::Script::new(HEARTBEAT_SCRIPT);
        loop {
            tokio::select! {
                _ = tokio::time::sleep(period) => {
                    let result = script
                        .key(&key)
                        .arg(&owner)
                        .arg(ttl_ms)
                        .invoke_async::<i64>(&mut conn)
                        .await;
                    if let Err(err) = result {
                        tracing::warn!(lock_key = %key, error = %err, "lock heartbeat failed");
                    }
                }
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

/// Direct existence check, used by admin/observability surfaces.
pub async fn is_locked(conn: &mut ConnectionManager, kind: QueueKind, id: &str) -> QueueResult<bool> {
    Ok(conn.exists(lock_key(kind, id)).await?)
}
