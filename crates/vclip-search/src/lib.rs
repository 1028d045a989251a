//! Search Index Adapter: an OpenSearch-compatible HTTP client over the
//! `videos` and `transcript_chunks` indexes, plus the BM25 query assembly
//! the Recall & Rerank Engine's OS-lane and the full-text search
//! collaborator endpoint both depend on.

pub mod client;
pub mod documents;
pub mod error;
pub mod full_text;
pub mod mappings;
pub mod query;

pub use client::{SearchClient, SearchConfig};
pub use documents::{transcript_chunk_doc_id, NestedCatalogDoc, TranscriptChunkDoc, VideoDoc};
pub use error::{SearchError, SearchResult};
pub use full_text::{
    build_metadata_query, build_transcript_fuzzy_query, build_transcript_phrase_query,
    transcript_minimum_should_match, FullTextSearchResult, MetadataHit, TranscriptHit,
};
pub use mappings::{TRANSCRIPT_CHUNKS_INDEX, VIDEOS_INDEX};
pub use query::{build_candidate_query, build_query_text, CandidateHit};
