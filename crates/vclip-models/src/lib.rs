//! Shared data models for the video ingest & recommendation platform.
//!
//! This crate provides Serde-serializable types for:
//! - Users, videos and their derived assets
//! - Watch history (input to the Seed Builder)
//! - The Topic/Entity/Tag catalog and per-video weighted join rows
//! - Queue envelope shapes shared by producers and consumers

pub mod catalog;
pub mod history;
pub mod ids;
pub mod queue;
pub mod user;
pub mod video;

pub use catalog::{
    canonicalize, clamp_weight, Entity, Tag, Topic, VideoEntity, VideoSummary, VideoTag,
    VideoTopic,
};
pub use history::WatchHistory;
pub use ids::{EntityId, TagId, TopicId, UserId, VideoAssetId, VideoId};
pub use queue::{reasons, DeadLetterEnvelope, JobEnvelope, QueueKind};
pub use user::{normalize_email, User};
pub use video::{AssetKind, AssetLabel, Video, VideoAsset, VideoStatus};
