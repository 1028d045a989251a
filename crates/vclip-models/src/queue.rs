//! Queue envelope shapes. Transport (Redis lists, locks, DLQs) lives in
//! `vclip-queue`; this crate only owns the wire shape both producers and
//! consumers agree on.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::VideoId;

pub mod reasons {
    pub const FINALIZE: &str = "finalize";
    pub const RETRY: &str = "retry";
    pub const VIDEO_READY: &str = "video_ready";
}

/// The two durable FIFO queues the Queue & Lock Service maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    Video,
    Email,
}

impl QueueKind {
    /// Main queue key, e.g. `q:videos`.
    pub fn queue_key(&self) -> &'static str {
        match self {
            QueueKind::Video => "q:videos",
            QueueKind::Email => "q:emails",
        }
    }

    /// Dead-letter list key, e.g. `dlq:videos`.
    pub fn dlq_key(&self) -> &'static str {
        match self {
            QueueKind::Video => "dlq:videos",
            QueueKind::Email => "dlq:emails",
        }
    }

    /// Lock-kind discriminant used in `lock:<kind>:<id>`.
    pub fn lock_kind(&self) -> &'static str {
        match self {
            QueueKind::Video => "video",
            QueueKind::Email => "email",
        }
    }
}

/// `{ "video_id": "<uuid>", "reason": "finalize|retry|video_ready|..." }`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobEnvelope {
    pub video_id: VideoId,
    pub reason: String,
}

impl JobEnvelope {
    pub fn new(video_id: VideoId, reason: impl Into<String>) -> Self {
        Self {
            video_id,
            reason: reason.into(),
        }
    }
}

/// DLQ envelopes carry the original envelope plus failure context.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeadLetterEnvelope {
    #[serde(flatten)]
    pub envelope: JobEnvelope,
    pub error: String,
    pub attempts: u32,
    pub ts: DateTime<Utc>,
}

impl DeadLetterEnvelope {
    pub fn new(envelope: JobEnvelope, error: impl Into<String>, attempts: u32) -> Self {
        Self {
            envelope,
            error: error.into(),
            attempts,
            ts: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_round_trips_through_json() {
        let env = JobEnvelope::new(VideoId::new(), reasons::FINALIZE);
        let json = serde_json::to_string(&env).unwrap();
        let back: JobEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(env.video_id, back.video_id);
        assert_eq!(back.reason, "finalize");
    }

    #[test]
    fn queue_kind_keys_match_spec_layout() {
        assert_eq!(QueueKind::Video.queue_key(), "q:videos");
        assert_eq!(QueueKind::Video.dlq_key(), "dlq:videos");
        assert_eq!(QueueKind::Email.queue_key(), "q:emails");
    }
}
