// src/services/supply.rs
use std::env;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Deserialize;

use crate::models::{SupplyPoint, SupplySeriesCollection, SupplySeriesCollections};
use crate::time_frames::{TimeFrame, TIME_FRAMES};

use super::cache::StatsCache;

pub const YEAR_IN_SECONDS: f64 = 365.25 * 24.0 * 60.0 * 60.0;

pub fn upstream_api_url() -> String {
    env::var("UPSTREAM_API_URL").unwrap_or_else(|_| "https://ultrasound.money".to_string())
}

#[derive(Debug, Deserialize)]
struct SupplyOverTimeResponse {
    since_burn: Vec<SupplyPoint>,
}

/// Fetch the full since-burn supply series from the upstream stats API.
pub async fn fetch_supply_over_time(base_url: &str) -> Result<Vec<SupplyPoint>> {
    let url = format!("{}/api/v2/fees/supply-over-time", base_url);
    info!("Fetching supply over time from URL: {}", url);

    let response = reqwest::get(&url)
        .await
        .context("supply-over-time request failed")?
        .error_for_status()
        .context("supply-over-time returned an error status")?;
    let body: SupplyOverTimeResponse = response
        .json()
        .await
        .context("failed to decode supply-over-time body")?;

    if body.since_burn.is_empty() {
        return Err(anyhow!("upstream returned an empty supply series"));
    }

    debug!("Fetched {} supply points", body.since_burn.len());
    Ok(body.since_burn)
}

/// Slice the master series down to one time frame's window.
pub fn slice_series(
    master: &[SupplyPoint],
    time_frame: TimeFrame,
    now: DateTime<Utc>,
) -> Vec<SupplyPoint> {
    let start = time_frame.start_of_window(now).timestamp();
    master
        .iter()
        .filter(|point| point.timestamp >= start)
        .copied()
        .collect()
}

/// Derive every per-time-frame collection from the master since-burn series.
/// Each collection carries its own rebuilt point map.
pub fn build_collections(master: &[SupplyPoint], now: DateTime<Utc>) -> SupplySeriesCollections {
    let mut collections = SupplySeriesCollections::default();
    for time_frame in TIME_FRAMES {
        let series = slice_series(master, time_frame, now);
        collections.insert(SupplySeriesCollection::new(time_frame, series, now));
    }
    collections
}

/// Annualized supply change as a fraction of the starting supply, from the
/// first and last points of a sliced series. `None` when the series is too
/// short or spans no time.
pub fn yearly_supply_change(series: &[SupplyPoint]) -> Option<f64> {
    let first = series.first()?;
    let last = series.last()?;
    let seconds_delta = (last.timestamp - first.timestamp) as f64;
    if seconds_delta <= 0.0 || first.supply <= 0.0 {
        return None;
    }
    let supply_delta = last.supply - first.supply;
    let yearly_delta = supply_delta / seconds_delta * YEAR_IN_SECONDS;
    Some(yearly_delta / first.supply)
}

/// Fetch the master series and swap the cache to fresh per-frame slices.
pub async fn refresh_supply(cache: &Arc<StatsCache>, base_url: &str) -> Result<()> {
    let master = fetch_supply_over_time(base_url).await?;
    let now = Utc::now();
    cache.set_supply(build_collections(&master, now), now).await;
    info!("Supply cache refreshed with {} master points", master.len());
    Ok(())
}
