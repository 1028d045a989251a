//! Object Store Adapter: an R2 (S3-compatible) client over the bucket/key
//! layout the ingest pipeline depends on.
//!
//! This crate provides:
//! - File/byte upload and download, including ranged GETs
//! - Presigned URL generation
//! - Recursive directory upload and prefix delete (video deletion cascade)
//! - Existence checks and paginated listing

pub mod client;
pub mod error;
pub mod operations;

pub use client::{ObjectInfo, R2Client, R2Config};
pub use error::{StorageError, StorageResult};
pub use operations::{content_type_for_key, Keys, Rung};
