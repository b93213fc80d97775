pub mod refresh;

pub use refresh::{RecommendationRefresher, RefreshReport, RefreshSummary};
