//! Graph Store Adapter: a Neo4j HTTP Cypher transactional-endpoint client
//! for durable mirror writes, and an in-process weighted random walk used
//! by the Recall & Rerank Engine's graph lane (see Design Notes: the walk
//! itself never touches a graph-analytics plug-in).

pub mod client;
pub mod error;
pub mod mirror;
pub mod walk;

pub use client::{GraphClient, GraphConfig, Statement};
pub use error::{GraphError, GraphResult};
pub use mirror::{InsertThresholds, MirrorItem};
pub use walk::{build_adjacency, weighted_random_walk, Adjacency, GraphEdge};
