// src/bin/warm_cache.rs
use dotenv::dotenv;
use log::info;

use eth_supply_dashboard::services::merge::{fetch_merge_estimate, time_left};
use eth_supply_dashboard::services::supply::{
    fetch_supply_over_time, upstream_api_url, yearly_supply_change,
};

// One-shot upstream fetch, useful for checking connectivity and the
// upstream payloads without starting the server.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let upstream = upstream_api_url();
    info!("Fetching upstream data from {}", upstream);

    let master = fetch_supply_over_time(&upstream).await?;
    println!("Supply series: {} points", master.len());
    if let (Some(first), Some(last)) = (master.first(), master.last()) {
        println!("  first: {} -> {:.2} ETH", first.timestamp, first.supply);
        println!("  last:  {} -> {:.2} ETH", last.timestamp, last.supply);
    }
    if let Some(change) = yearly_supply_change(&master) {
        println!("  yearly change: {:+.3}%", change * 100.0);
    }

    let estimate = fetch_merge_estimate(&upstream).await?;
    let left = time_left(estimate.estimated_date_time, chrono::Utc::now());
    println!(
        "Merge estimate: block {}, {} blocks left, ETA {} ({}d {}h {}m {}s)",
        estimate.block_number,
        estimate.blocks_left,
        estimate.estimated_date_time,
        left.days,
        left.hours,
        left.minutes,
        left.seconds
    );

    Ok(())
}
