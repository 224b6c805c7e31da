// src/services/merge.rs
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;

use crate::hardforks::TOTAL_TERMINAL_DIFFICULTY;
use crate::models::{MergeEstimate, TimeLeft};

use super::cache::StatsCache;
use super::format::format_zero_decimals;

#[derive(Debug, Deserialize)]
struct MergeEstimateResponse {
    block_number: u64,
    blocks_left: u64,
    difficulty: f64,
    // Upstream sends total difficulty as a decimal string; it overflows u64.
    total_difficulty: String,
    estimated_date_time: DateTime<Utc>,
}

/// Fetch the merge estimate from the upstream stats API.
pub async fn fetch_merge_estimate(base_url: &str) -> Result<MergeEstimate> {
    let url = format!("{}/api/v1/merge-estimate", base_url);
    info!("Fetching merge estimate from URL: {}", url);

    let response = reqwest::get(&url)
        .await
        .context("merge-estimate request failed")?
        .error_for_status()
        .context("merge-estimate returned an error status")?;
    let body: MergeEstimateResponse = response
        .json()
        .await
        .context("failed to decode merge-estimate body")?;

    let total_difficulty: f64 = body
        .total_difficulty
        .parse()
        .context("total_difficulty is not a number")?;

    Ok(MergeEstimate {
        block_number: body.block_number,
        blocks_left: body.blocks_left,
        difficulty: body.difficulty,
        total_difficulty_tera: total_difficulty / 1e12,
        estimated_date_time: body.estimated_date_time,
    })
}

/// Whole-unit countdown to the estimated merge, against the caller's clock.
/// Zero across the board once the estimate has passed.
pub fn time_left(estimated_date_time: DateTime<Utc>, now: DateTime<Utc>) -> TimeLeft {
    let total_seconds = (estimated_date_time - now).num_seconds().max(0);
    TimeLeft {
        days: total_seconds / 86_400,
        hours: total_seconds / 3_600 % 24,
        minutes: total_seconds / 60 % 60,
        seconds: total_seconds % 60,
    }
}

pub fn terminal_reached(estimate: &MergeEstimate) -> bool {
    estimate.total_difficulty_tera >= TOTAL_TERMINAL_DIFFICULTY
}

/// Block count label for the countdown widget. The compact form truncates
/// thousands for narrow layouts, e.g. `12_450` -> `"12K"`.
pub fn format_blocks_to_ttd(blocks_left: u64, compact: bool) -> String {
    if compact && blocks_left > 1_000 {
        format!("{}K", format_zero_decimals(blocks_left as f64 / 1e3))
    } else {
        format_zero_decimals(blocks_left as f64)
    }
}

pub async fn refresh_merge_estimate(cache: &Arc<StatsCache>, base_url: &str) -> Result<()> {
    let estimate = fetch_merge_estimate(base_url).await?;
    cache.set_merge_estimate(estimate, Utc::now()).await;
    info!("Merge estimate cache refreshed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn estimate_with_ttd(total_difficulty_tera: f64) -> MergeEstimate {
        MergeEstimate {
            block_number: 15_000_000,
            blocks_left: 12_450,
            difficulty: 12.5e15,
            total_difficulty_tera,
            estimated_date_time: Utc.timestamp_opt(1_663_224_162, 0).unwrap(),
        }
    }

    #[test]
    fn time_left_decomposes_whole_units() {
        let now = Utc.timestamp_opt(1_660_000_000, 0).unwrap();
        let estimated = now + Duration::days(2) + Duration::hours(3) + Duration::minutes(4) + Duration::seconds(5);

        let left = time_left(estimated, now);
        assert_eq!(
            left,
            TimeLeft {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
    }

    #[test]
    fn time_left_clamps_once_past() {
        let now = Utc.timestamp_opt(1_660_000_000, 0).unwrap();
        let left = time_left(now - Duration::hours(1), now);
        assert_eq!(
            left,
            TimeLeft {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn terminal_difficulty_comparison() {
        assert!(!terminal_reached(&estimate_with_ttd(58_749_999_999.0)));
        assert!(terminal_reached(&estimate_with_ttd(TOTAL_TERMINAL_DIFFICULTY)));
    }

    #[test]
    fn blocks_label_truncates_thousands_when_compact() {
        assert_eq!(format_blocks_to_ttd(12_450, true), "12K");
        assert_eq!(format_blocks_to_ttd(12_450, false), "12,450");
        assert_eq!(format_blocks_to_ttd(999, true), "999");
    }
}
