// src/models.rs
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time_frames::TimeFrame;

/// One observation of the ETH supply: unix seconds paired with the supply
/// at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyPoint {
    pub timestamp: i64,
    pub supply: f64,
}

/// O(1) timestamp lookup over a supply series, used for tooltip rendering.
///
/// Derived cache with no lifecycle of its own: rebuild whenever the series
/// it mirrors is replaced, never treat it as the source of truth. A missing
/// timestamp means "no data at this exact cursor position", not an error.
#[derive(Debug, Clone, Default)]
pub struct PointMap {
    points: HashMap<i64, f64>,
}

impl PointMap {
    pub fn from_series(series: &[SupplyPoint]) -> Self {
        let points = series
            .iter()
            .map(|point| (point.timestamp, point.supply))
            .collect();
        PointMap { points }
    }

    pub fn get(&self, timestamp: i64) -> Option<f64> {
        self.points.get(&timestamp).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The supply series sliced to one time frame, plus its lookup projection
/// and the moment the slice was built.
#[derive(Debug, Clone)]
pub struct SupplySeriesCollection {
    pub time_frame: TimeFrame,
    pub series: Vec<SupplyPoint>,
    pub point_map: PointMap,
    pub built_at: DateTime<Utc>,
}

impl SupplySeriesCollection {
    pub fn new(time_frame: TimeFrame, series: Vec<SupplyPoint>, built_at: DateTime<Utc>) -> Self {
        let point_map = PointMap::from_series(&series);
        SupplySeriesCollection {
            time_frame,
            series,
            point_map,
            built_at,
        }
    }
}

/// Per-time-frame collections derived from one master since-burn series.
#[derive(Debug, Clone, Default)]
pub struct SupplySeriesCollections {
    collections: HashMap<TimeFrame, SupplySeriesCollection>,
}

impl SupplySeriesCollections {
    pub fn insert(&mut self, collection: SupplySeriesCollection) {
        self.collections.insert(collection.time_frame, collection);
    }

    pub fn get(&self, time_frame: TimeFrame) -> Option<&SupplySeriesCollection> {
        self.collections.get(&time_frame)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

/// Merge countdown data as served to the widgets. Total difficulty is kept
/// in tera-units, matching the terminal difficulty constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeEstimate {
    pub block_number: u64,
    pub blocks_left: u64,
    pub difficulty: f64,
    pub total_difficulty_tera: f64,
    pub estimated_date_time: DateTime<Utc>,
}

/// Whole-unit countdown decomposition for the merge estimate widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_map_looks_up_exact_timestamps_only() {
        let series = vec![
            SupplyPoint {
                timestamp: 0,
                supply: 10.0,
            },
            SupplyPoint {
                timestamp: 60,
                supply: 20.0,
            },
            SupplyPoint {
                timestamp: 120,
                supply: 15.0,
            },
        ];
        let point_map = PointMap::from_series(&series);

        assert_eq!(point_map.get(60), Some(20.0));
        assert_eq!(point_map.get(30), None);
        assert_eq!(point_map.len(), 3);
    }

    #[test]
    fn collection_rebuilds_point_map_from_its_slice() {
        let built_at = Utc::now();
        let series = vec![SupplyPoint {
            timestamp: 1_700_000_000,
            supply: 120_000_000.5,
        }];
        let collection = SupplySeriesCollection::new(TimeFrame::D1, series, built_at);

        assert_eq!(collection.point_map.get(1_700_000_000), Some(120_000_000.5));
        assert!(collection.point_map.get(0).is_none());
    }
}
