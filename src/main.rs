use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use log::{error, info, warn};
use tokio_cron_scheduler::{Job, JobScheduler};
use warp::Filter;

use eth_supply_dashboard::routes;
use eth_supply_dashboard::services::cache::StatsCache;
use eth_supply_dashboard::services::merge::refresh_merge_estimate;
use eth_supply_dashboard::services::supply::{refresh_supply, upstream_api_url};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });
    let port: u16 = port_str.parse().expect("PORT must be a number");
    info!("Using PORT: {}", port);

    let upstream = upstream_api_url();
    info!("Upstream stats API: {}", upstream);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Will bind to: {}", addr);

    let cache = Arc::new(StatsCache::new());

    // Warm the cache once at startup. Failures are logged and left to the
    // handlers' stale checks to retry.
    if let Err(e) = refresh_supply(&cache, &upstream).await {
        error!("Initial supply fetch failed: {:#}", e);
    }
    if let Err(e) = refresh_merge_estimate(&cache, &upstream).await {
        error!("Initial merge estimate fetch failed: {:#}", e);
    }

    // Background refresh keeps the cache warm between requests.
    let scheduler = JobScheduler::new().await?;
    let supply_cache = cache.clone();
    scheduler
        .add(Job::new_async("0 */5 * * * *", move |_uuid, _lock| {
            let cache = supply_cache.clone();
            Box::pin(async move {
                if let Err(e) = refresh_supply(&cache, &upstream_api_url()).await {
                    error!("Scheduled supply refresh failed: {:#}", e);
                }
            })
        })?)
        .await?;
    let merge_cache = cache.clone();
    scheduler
        .add(Job::new_async("*/30 * * * * *", move |_uuid, _lock| {
            let cache = merge_cache.clone();
            Box::pin(async move {
                if let Err(e) = refresh_merge_estimate(&cache, &upstream_api_url()).await {
                    error!("Scheduled merge estimate refresh failed: {:#}", e);
                }
            })
        })?)
        .await?;
    scheduler.start().await?;
    info!("Background refresh jobs scheduled.");

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(cache).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;

    Ok(())
}
