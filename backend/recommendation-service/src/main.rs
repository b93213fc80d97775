use anyhow::Context;
use chrono::Utc;
use recommendation_service::jobs::RefreshSummary;
use recommendation_service::models::{CachedRecommendation, UserId, GENERAL_RECOMMENDATIONS};
use recommendation_service::providers::{InMemoryStore, RecommendationStore, SnapshotProvider};
use recommendation_service::{Config, RecommendationRefresher};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Serialize)]
struct RefreshOutput {
    summary: RefreshSummary,
    recommendations: Vec<UserRecommendations>,
}

#[derive(Serialize)]
struct UserRecommendations {
    user_id: UserId,
    entries: Vec<CachedRecommendation>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load config")?;

    // Initialize tracing; stdout carries the JSON result
    let fmt_layer = if config.service.log_json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(
        service = %config.service.service_name,
        snapshot = %config.service.snapshot_path,
        "Starting recommendation refresh"
    );

    let provider = Arc::new(
        SnapshotProvider::from_path(&config.service.snapshot_path)
            .await
            .with_context(|| format!("Failed to load snapshot {}", config.service.snapshot_path))?,
    );
    let store = Arc::new(InMemoryStore::new());

    let refresher = RecommendationRefresher::new(
        provider.clone(),
        provider.clone(),
        store.clone(),
        &config.recommendation,
    )
    .context("Invalid recommendation config")?;

    let user_ids = match config.service.target_user_id {
        Some(user_id) => vec![user_id],
        None => provider.user_ids(),
    };

    let summary = refresher.refresh_users(&user_ids, Utc::now()).await;

    let mut recommendations = Vec::with_capacity(summary.reports.len());
    for report in &summary.reports {
        let entries = store
            .cached(report.user_id, GENERAL_RECOMMENDATIONS, config.recommendation.default_top_n)
            .await?;
        recommendations.push(UserRecommendations {
            user_id: report.user_id,
            entries,
        });
    }

    let output = RefreshOutput {
        summary,
        recommendations,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
