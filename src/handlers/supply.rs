// src/handlers/supply.rs
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use warp::Rejection;

use crate::models::SupplyPoint;
use crate::services::cache::StatsCache;
use crate::services::format::format_percent_three_decimals_signed;
use crate::services::supply::{refresh_supply, upstream_api_url, yearly_supply_change};
use crate::time_frames::{from_old_time_frame, to_old_time_frame, InvalidTimeFrame, TimeFrame, TimeFrameOld};

use super::error::ApiError;

const SUPPLY_CACHE_MAX_AGE_MINUTES: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct SupplyQuery {
    pub time_frame: Option<String>,
}

/// Decode a `time_frame` query token. Current-vocabulary tokens win; the
/// legacy vocabulary (notably `all`) is decoded through its conversion and
/// flagged so responses can echo the encoding the client used.
pub fn parse_time_frame_token(raw: &str) -> Result<(TimeFrame, bool), InvalidTimeFrame> {
    match raw.parse::<TimeFrame>() {
        Ok(time_frame) => Ok((time_frame, false)),
        Err(_) => {
            let old = raw.parse::<TimeFrameOld>()?;
            Ok((from_old_time_frame(old), true))
        }
    }
}

/// Echo a time frame in the vocabulary the client sent it in, so legacy
/// query parameters round-trip without loss.
pub fn echo_time_frame_token(time_frame: TimeFrame, legacy: bool) -> String {
    if legacy {
        // A legacy flag implies the frame came through the legacy decoder,
        // which never yields since_merge.
        match to_old_time_frame(time_frame) {
            Ok(old) => old.to_string(),
            Err(_) => time_frame.to_string(),
        }
    } else {
        time_frame.to_string()
    }
}

/// Refresh the supply cache when stale, preferring stale data over an error
/// when upstream is down.
async fn ensure_fresh_supply(cache: &Arc<StatsCache>) -> Result<(), Rejection> {
    let fetched_at = cache.timestamps().await.supply_series;
    if fetched_at >= Utc::now() - Duration::minutes(SUPPLY_CACHE_MAX_AGE_MINUTES) {
        return Ok(());
    }

    info!("Supply cache stale (last fetch {}), refreshing", fetched_at);
    if let Err(e) = refresh_supply(cache, &upstream_api_url()).await {
        error!("Failed to refresh supply data: {:#}", e);
        if cache.has_supply_data().await {
            warn!("Serving stale supply data");
            return Ok(());
        }
        return Err(warp::reject::custom(ApiError::external_error(format!(
            "failed to fetch supply data: {}",
            e
        ))));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SupplyOverTimeBody {
    time_frame: String,
    built_at: DateTime<Utc>,
    series: Vec<SupplyPoint>,
    yearly_supply_change: Option<f64>,
    yearly_supply_change_formatted: Option<String>,
}

pub async fn get_supply_over_time(
    query: SupplyQuery,
    cache: Arc<StatsCache>,
) -> Result<impl warp::Reply, Rejection> {
    info!("Handling request to get supply over time");

    let raw = query.time_frame.as_deref().unwrap_or("d1");
    let (time_frame, legacy) = parse_time_frame_token(raw)
        .map_err(|e| warp::reject::custom(ApiError::bad_request(e.to_string())))?;
    debug!("Resolved time frame {} (legacy: {})", time_frame, legacy);

    ensure_fresh_supply(&cache).await?;

    let collection = match cache.supply_collection(time_frame).await {
        Some(collection) => collection,
        None => {
            error!("Supply cache has no collection for {}", time_frame);
            return Err(warp::reject::custom(ApiError::internal_error(
                "supply data not available",
            )));
        }
    };

    let yearly_change = yearly_supply_change(&collection.series);
    let body = SupplyOverTimeBody {
        time_frame: echo_time_frame_token(time_frame, legacy),
        built_at: collection.built_at,
        yearly_supply_change: yearly_change,
        yearly_supply_change_formatted: yearly_change.map(format_percent_three_decimals_signed),
        series: collection.series,
    };
    Ok(warp::reply::json(&body))
}

#[derive(Debug, Serialize)]
struct SupplyPointBody {
    time_frame: String,
    timestamp: i64,
    supply: Option<f64>,
}

/// Exact-timestamp lookup against the derived point map. An absent
/// timestamp is not an error: `supply` is null and the tooltip stays
/// hidden.
pub async fn get_supply_point(
    raw_time_frame: String,
    timestamp: i64,
    cache: Arc<StatsCache>,
) -> Result<impl warp::Reply, Rejection> {
    debug!(
        "Handling supply point lookup for {} at {}",
        raw_time_frame, timestamp
    );

    let (time_frame, legacy) = parse_time_frame_token(&raw_time_frame)
        .map_err(|e| warp::reject::custom(ApiError::bad_request(e.to_string())))?;

    ensure_fresh_supply(&cache).await?;

    let collection = match cache.supply_collection(time_frame).await {
        Some(collection) => collection,
        None => return Err(warp::reject::not_found()),
    };

    let body = SupplyPointBody {
        time_frame: echo_time_frame_token(time_frame, legacy),
        timestamp,
        supply: collection.point_map.get(timestamp),
    };
    Ok(warp::reply::json(&body))
}
