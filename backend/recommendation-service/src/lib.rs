pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod providers;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use jobs::RecommendationRefresher;
pub use services::{
    CollaborativeFilteringEngine, ContentBasedEngine, FreshnessPolicy, GenreAffinityEngine,
    HybridRecommendationEngine, HybridWeights,
};
