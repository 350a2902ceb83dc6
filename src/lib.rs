//! lahmangraph - hitter similarity over Lahman batting data
//!
//! Serves player and season lookups from a graph store and ranks hitters by
//! cosine similarity of their per-at-bat rates:
//! - Fixed 5-feature rate vectors (HR, BB, SO, H, SB per AB)
//! - Top-k cosine ranking with self-exclusion
//! - Per-feature deltas and a plain-language explanation per match

pub mod types;
pub mod error;
pub mod features;
pub mod scoring;
pub mod explain;
pub mod store;
pub mod neo4j_store;
pub mod graph_client;
pub mod ingest;
pub mod config;
pub mod engine;
pub mod server;

pub use types::*;
pub use error::{ServiceError, ServiceResult, SimilarityError};
pub use features::build_vector;
pub use scoring::{cosine_similarity, rank};
pub use explain::{compute_feature_deltas, explain};
pub use store::{BattingStore, MemoryStore};
pub use neo4j_store::Neo4jStore;
pub use graph_client::GraphClient;
pub use config::{Config, Neo4jConfig};
pub use engine::{SimilarityEngine, SharedSimilarityEngine};
