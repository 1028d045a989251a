//! Thin HTTP glue over the ingest pipeline and recommendation engine.
//! Upload presigning and authentication remain external collaborators
//! and are not implemented here.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
