pub mod freshness;
pub mod reading;
pub mod recommendation;

pub use freshness::FreshnessPolicy;
pub use reading::{ReadingGoal, ReadingSessionTracker, ReadingStats};
pub use recommendation::{
    CollaborativeFilteringEngine, ContentBasedEngine, GenreAffinityEngine,
    HybridRecommendationEngine, HybridWeights,
};
