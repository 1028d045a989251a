//! Notifier Worker: single-delivery ready-video email on the first
//! transition into `ready`, sharing the Queue & Lock Service's
//! lock/retry/backoff/DLQ policy with the Job Worker.

pub mod config;
pub mod error;
pub mod executor;
pub mod mailer;
pub mod pipeline;

pub use config::NotifierConfig;
pub use error::{NotifierError, NotifierResult};
pub use executor::NotifyExecutor;
pub use mailer::Mailer;
pub use pipeline::NotifyPipeline;
