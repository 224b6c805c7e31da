// src/services/cache.rs
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;

use crate::models::{MergeEstimate, SupplySeriesCollection, SupplySeriesCollections};
use crate::time_frames::TimeFrame;

#[derive(Debug, Clone, Copy)]
pub struct CacheTimestamps {
    pub supply_series: DateTime<Utc>,
    pub merge_estimate: DateTime<Utc>,
}

impl Default for CacheTimestamps {
    fn default() -> Self {
        // Epoch timestamps read as "never fetched" and force the first refresh.
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        CacheTimestamps {
            supply_series: epoch,
            merge_estimate: epoch,
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    supply: SupplySeriesCollections,
    merge_estimate: Option<MergeEstimate>,
    timestamps: CacheTimestamps,
}

/// In-process store for the upstream data the dashboard serves. Everything
/// in here is a regenerable projection of upstream state; losing it only
/// costs a refetch.
#[derive(Debug, Default)]
pub struct StatsCache {
    inner: RwLock<CacheInner>,
}

impl StatsCache {
    pub fn new() -> Self {
        StatsCache::default()
    }

    pub async fn timestamps(&self) -> CacheTimestamps {
        self.inner.read().await.timestamps
    }

    pub async fn supply_collection(&self, time_frame: TimeFrame) -> Option<SupplySeriesCollection> {
        self.inner.read().await.supply.get(time_frame).cloned()
    }

    pub async fn has_supply_data(&self) -> bool {
        !self.inner.read().await.supply.is_empty()
    }

    pub async fn set_supply(&self, collections: SupplySeriesCollections, fetched_at: DateTime<Utc>) {
        let mut inner = self.inner.write().await;
        inner.supply = collections;
        inner.timestamps.supply_series = fetched_at;
    }

    pub async fn merge_estimate(&self) -> Option<MergeEstimate> {
        self.inner.read().await.merge_estimate.clone()
    }

    pub async fn set_merge_estimate(&self, estimate: MergeEstimate, fetched_at: DateTime<Utc>) {
        let mut inner = self.inner.write().await;
        inner.merge_estimate = Some(estimate);
        inner.timestamps.merge_estimate = fetched_at;
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{SupplyPoint, SupplySeriesCollection};

    use super::*;

    #[tokio::test]
    async fn fresh_cache_reports_nothing_fetched() {
        let cache = StatsCache::new();
        assert!(!cache.has_supply_data().await);
        assert!(cache.merge_estimate().await.is_none());
        assert_eq!(cache.timestamps().await.supply_series.timestamp(), 0);
    }

    #[tokio::test]
    async fn set_supply_replaces_collections_and_timestamp() {
        let cache = StatsCache::new();
        let now = Utc::now();
        let mut collections = SupplySeriesCollections::default();
        collections.insert(SupplySeriesCollection::new(
            TimeFrame::M5,
            vec![SupplyPoint {
                timestamp: 100,
                supply: 1.0,
            }],
            now,
        ));

        cache.set_supply(collections, now).await;

        assert!(cache.has_supply_data().await);
        let collection = cache.supply_collection(TimeFrame::M5).await.unwrap();
        assert_eq!(collection.series.len(), 1);
        assert_eq!(cache.timestamps().await.supply_series, now);
        assert!(cache.supply_collection(TimeFrame::D7).await.is_none());
    }
}
