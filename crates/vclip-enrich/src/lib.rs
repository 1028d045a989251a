//! Content Enricher: prompts an LLM for structured video metadata, decodes
//! the result tolerantly, normalizes it, and persists it across the
//! relational store, the graph mirror, and the search index.

pub mod error;
pub mod llm;
pub mod normalize;
pub mod persist;
pub mod prompt;
pub mod schema;

pub use error::{EnrichError, EnrichResult};
pub use llm::{Embedder, GeminiClient};
pub use normalize::{normalize, NormalizedEnrichment, NormalizedEntity, NormalizedItem};
pub use persist::{ContentEnricher, EnrichOutcome, IndexThresholds, VideoIndexContext};
pub use prompt::{build_embedding_text, build_prompt, clip_transcript, MAX_TRANSCRIPT_CHARS};
pub use schema::{decode_tolerant, RawEnrichment};
