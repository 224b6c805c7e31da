// src/handlers/merge.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use serde::Serialize;
use warp::Rejection;

use crate::models::TimeLeft;
use crate::services::cache::StatsCache;
use crate::services::merge::{
    format_blocks_to_ttd, refresh_merge_estimate, terminal_reached, time_left,
};
use crate::services::supply::upstream_api_url;

use super::error::ApiError;

const MERGE_CACHE_MAX_AGE_SECONDS: i64 = 60;

#[derive(Debug, Serialize)]
struct MergeEstimateBody {
    block_number: u64,
    blocks_left: u64,
    blocks_left_display: String,
    blocks_left_display_compact: String,
    difficulty: f64,
    total_difficulty_tera: f64,
    estimated_date_time: DateTime<Utc>,
    estimated_date_time_formatted: String,
    time_left: TimeLeft,
    terminal_reached: bool,
}

pub async fn get_merge_estimate(cache: Arc<StatsCache>) -> Result<impl warp::Reply, Rejection> {
    info!("Handling request to get merge estimate");

    let fetched_at = cache.timestamps().await.merge_estimate;
    if fetched_at < Utc::now() - Duration::seconds(MERGE_CACHE_MAX_AGE_SECONDS) {
        info!("Merge estimate stale (last fetch {}), refreshing", fetched_at);
        if let Err(e) = refresh_merge_estimate(&cache, &upstream_api_url()).await {
            error!("Failed to refresh merge estimate: {:#}", e);
            if cache.merge_estimate().await.is_some() {
                warn!("Serving stale merge estimate");
            } else {
                return Err(warp::reject::custom(ApiError::external_error(format!(
                    "failed to fetch merge estimate: {}",
                    e
                ))));
            }
        }
    }

    let estimate = match cache.merge_estimate().await {
        Some(estimate) => estimate,
        None => {
            return Err(warp::reject::custom(ApiError::internal_error(
                "merge estimate not available",
            )))
        }
    };

    let body = MergeEstimateBody {
        block_number: estimate.block_number,
        blocks_left: estimate.blocks_left,
        blocks_left_display: format_blocks_to_ttd(estimate.blocks_left, false),
        blocks_left_display_compact: format_blocks_to_ttd(estimate.blocks_left, true),
        difficulty: estimate.difficulty,
        total_difficulty_tera: estimate.total_difficulty_tera,
        estimated_date_time: estimate.estimated_date_time,
        estimated_date_time_formatted: format!(
            "{} UTC",
            estimate.estimated_date_time.format("%b %-d, %-l%P")
        ),
        time_left: time_left(estimate.estimated_date_time, Utc::now()),
        terminal_reached: terminal_reached(&estimate),
    };
    Ok(warp::reply::json(&body))
}
