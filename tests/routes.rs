// tests/routes.rs
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;

use eth_supply_dashboard::models::{MergeEstimate, SupplyPoint};
use eth_supply_dashboard::routes::routes;
use eth_supply_dashboard::services::cache::StatsCache;
use eth_supply_dashboard::services::supply::build_collections;

// Seeds the cache with fresh data so handlers serve without touching the
// upstream API.
async fn seeded_cache() -> (Arc<StatsCache>, Vec<i64>) {
    let now = Utc::now();
    let timestamps = vec![
        now.timestamp() - 240,
        now.timestamp() - 120,
        now.timestamp() - 60,
    ];
    let master: Vec<SupplyPoint> = timestamps
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| SupplyPoint {
            timestamp,
            supply: 120_000_000.0 + i as f64,
        })
        .collect();

    let cache = Arc::new(StatsCache::new());
    cache.set_supply(build_collections(&master, now), now).await;
    cache
        .set_merge_estimate(
            MergeEstimate {
                block_number: 15_400_000,
                blocks_left: 137_393,
                difficulty: 12.5e15,
                total_difficulty_tera: 58_000_000_000.0,
                estimated_date_time: now + Duration::days(2),
            },
            now,
        )
        .await;
    (cache, timestamps)
}

#[tokio::test]
async fn supply_over_time_round_trips_the_legacy_token() {
    let (cache, timestamps) = seeded_cache().await;
    let api = routes(cache);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/supply-over-time?time_frame=all")
        .reply(&api)
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["time_frame"], "all");
    assert_eq!(body["series"].as_array().unwrap().len(), timestamps.len());
}

#[tokio::test]
async fn supply_over_time_echoes_current_tokens_unchanged() {
    let (cache, _) = seeded_cache().await;
    let api = routes(cache);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/supply-over-time?time_frame=since_burn")
        .reply(&api)
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["time_frame"], "since_burn");
}

#[tokio::test]
async fn supply_over_time_rejects_unknown_tokens() {
    let (cache, _) = seeded_cache().await;
    let api = routes(cache);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/supply-over-time?time_frame=fortnight")
        .reply(&api)
        .await;

    assert_eq!(resp.status(), 400);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["error"], "invalid time frame: fortnight");
}

#[tokio::test]
async fn supply_point_hits_and_misses() {
    let (cache, timestamps) = seeded_cache().await;
    let api = routes(cache);

    let hit = warp::test::request()
        .method("GET")
        .path(&format!("/api/v1/supply/point/d1/{}", timestamps[1]))
        .reply(&api)
        .await;
    assert_eq!(hit.status(), 200);
    let body: Value = serde_json::from_slice(hit.body()).unwrap();
    assert_eq!(body["supply"], 120_000_001.0);

    // One second off the sampled timestamp: no data, not an error.
    let miss = warp::test::request()
        .method("GET")
        .path(&format!("/api/v1/supply/point/d1/{}", timestamps[1] + 1))
        .reply(&api)
        .await;
    assert_eq!(miss.status(), 200);
    let body: Value = serde_json::from_slice(miss.body()).unwrap();
    assert!(body["supply"].is_null());
}

#[tokio::test]
async fn merge_estimate_serves_countdown_fields() {
    let (cache, _) = seeded_cache().await;
    let api = routes(cache);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/merge-estimate")
        .reply(&api)
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["blocks_left"], 137_393);
    assert_eq!(body["blocks_left_display"], "137,393");
    assert_eq!(body["blocks_left_display_compact"], "137K");
    assert_eq!(body["terminal_reached"], false);
    // Roughly two days out; the seconds spent in the test eat into hours.
    assert!(body["time_left"]["days"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn time_frames_table_lists_tokens_and_labels() {
    let (cache, _) = seeded_cache().await;
    let api = routes(cache);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/time-frames")
        .reply(&api)
        .await;

    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    let entries = body["time_frames"].as_array().unwrap();
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0]["token"], "m5");
    assert_eq!(entries[0]["label"], "5m");
    assert_eq!(entries[5]["token"], "since_burn");
    assert!(entries[5]["label"].is_null());
    assert_eq!(body["legacy"][5], "all");
}

#[tokio::test]
async fn next_time_frame_cycles_and_checks_membership() {
    let (cache, _) = seeded_cache().await;
    let api = routes(cache);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/time-frames/next?current=d30&set=old")
        .reply(&api)
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["next"], "all");

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/time-frames/next?current=all&set=old")
        .reply(&api)
        .await;
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["next"], "m5");

    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/time-frames/next?current=since_burn")
        .reply(&api)
        .await;
    let body: Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["next"], "m5");

    // since_merge is outside the no-merge cycle: checked, not wrapped over.
    let resp = warp::test::request()
        .method("GET")
        .path("/api/v1/time-frames/next?current=since_merge")
        .reply(&api)
        .await;
    assert_eq!(resp.status(), 400);
}
