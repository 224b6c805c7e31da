// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::{ApiError, ApiErrorKind};
use crate::handlers::merge::get_merge_estimate;
use crate::handlers::supply::{get_supply_over_time, get_supply_point};
use crate::handlers::time_frames::{get_next_time_frame, get_time_frames};
use crate::services::cache::StatsCache;

// Recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = match api_error.kind {
            ApiErrorKind::BadRequest => warp::http::StatusCode::BAD_REQUEST,
            ApiErrorKind::External => warp::http::StatusCode::BAD_GATEWAY,
            ApiErrorKind::Internal => warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        message = api_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    cache: Arc<StatsCache>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let cache_filter = warp::any().map(move || cache.clone());

    let supply_over_time_route = warp::path!("api" / "v1" / "supply-over-time")
        .and(warp::get())
        .and(warp::query())
        .and(cache_filter.clone())
        .and_then(get_supply_over_time);

    let supply_point_route = warp::path!("api" / "v1" / "supply" / "point" / String / i64)
        .and(warp::get())
        .and(cache_filter.clone())
        .and_then(get_supply_point);

    let merge_estimate_route = warp::path!("api" / "v1" / "merge-estimate")
        .and(warp::get())
        .and(cache_filter.clone())
        .and_then(get_merge_estimate);

    let next_time_frame_route = warp::path!("api" / "v1" / "time-frames" / "next")
        .and(warp::get())
        .and(warp::query())
        .and_then(get_next_time_frame);

    let time_frames_route = warp::path!("api" / "v1" / "time-frames")
        .and(warp::get())
        .and_then(get_time_frames);

    info!("All routes configured successfully.");

    supply_over_time_route
        .or(supply_point_route)
        .or(merge_estimate_route)
        .or(next_time_frame_route)
        .or(time_frames_route)
        .recover(handle_rejection)
}
