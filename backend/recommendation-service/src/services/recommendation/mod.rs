//! Recommendation engines
//!
//! - Collaborative filtering: user-user kNN over normalized interactions
//! - Content-based: Jaccard similarity over categorical manga features
//! - Hybrid: fixed-weight blend of the two
//! - Genre affinity: single-user "For You" and "Because you read" lists

pub mod collaborative_filtering;
pub mod content_based;
pub mod genre_affinity;
pub mod hybrid_ranker;

pub use collaborative_filtering::{
    CollaborativeConfig, CollaborativeFilteringEngine, CollaborativeRecommendation,
};
pub use content_based::{ContentBasedEngine, ContentRecommendation};
pub use genre_affinity::{genre_similarity, interaction_from_history, GenreAffinityEngine};
pub use hybrid_ranker::{HybridRecommendation, HybridRecommendationEngine, HybridWeights};
