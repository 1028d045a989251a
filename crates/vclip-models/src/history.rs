//! Watch history: per-(user, video) progress used by the Seed Builder.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{UserId, VideoId};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WatchHistory {
    pub user_id: UserId,
    pub video_id: VideoId,
    pub last_position_seconds: f64,
    pub last_watched_at: DateTime<Utc>,
}

impl WatchHistory {
    pub fn new(user_id: UserId, video_id: VideoId, last_position_seconds: f64) -> Self {
        Self {
            user_id,
            video_id,
            last_position_seconds: last_position_seconds.max(0.0),
            last_watched_at: Utc::now(),
        }
    }

    /// Advance `last_watched_at` monotonically and record the new position.
    /// A heartbeat from the past (clock skew, replay) never rewinds it.
    pub fn record_heartbeat(&mut self, position_seconds: f64, at: DateTime<Utc>) {
        self.last_position_seconds = position_seconds.max(0.0);
        if at > self.last_watched_at {
            self.last_watched_at = at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn heartbeat_never_rewinds_last_watched_at() {
        let mut h = WatchHistory::new(UserId::new(), VideoId::new(), 10.0);
        let later = h.last_watched_at;
        h.record_heartbeat(20.0, later - Duration::seconds(60));
        assert_eq!(h.last_watched_at, later);
        assert_eq!(h.last_position_seconds, 20.0);
    }

    #[test]
    fn position_is_clamped_non_negative() {
        let h = WatchHistory::new(UserId::new(), VideoId::new(), -5.0);
        assert_eq!(h.last_position_seconds, 0.0);
    }
}
