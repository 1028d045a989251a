//! Request handlers: thin glue over the core adapters.

pub mod feed;
pub mod health;
pub mod search;
pub mod videos;
