// src/handlers/time_frames.rs
use log::debug;
use serde::{Deserialize, Serialize};
use warp::Rejection;

use crate::time_frames::{
    next_time_frame_no_merge, next_time_frame_old, InvalidTimeFrame, LimitedTimeFrame, TimeFrame,
    TimeFrameOld, TIME_FRAMES, TIME_FRAMES_NO_MERGE, TIME_FRAMES_OLD,
};

use super::error::ApiError;

#[derive(Debug, Serialize)]
struct TimeFrameEntry {
    token: &'static str,
    label: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct TimeFramesBody {
    time_frames: Vec<TimeFrameEntry>,
    no_merge: Vec<&'static str>,
    legacy: Vec<&'static str>,
}

/// The ordered token/label table backing the frontend's time-frame control.
/// Anchor frames have no numeric label; the control renders icons for them.
pub async fn get_time_frames() -> Result<impl warp::Reply, Rejection> {
    let time_frames = TIME_FRAMES
        .iter()
        .map(|time_frame| TimeFrameEntry {
            token: time_frame.as_str(),
            label: LimitedTimeFrame::try_from(*time_frame)
                .ok()
                .map(LimitedTimeFrame::display_label),
        })
        .collect();

    let body = TimeFramesBody {
        time_frames,
        no_merge: TIME_FRAMES_NO_MERGE.iter().map(|t| t.as_str()).collect(),
        legacy: TIME_FRAMES_OLD.iter().map(|t| t.as_str()).collect(),
    };
    Ok(warp::reply::json(&body))
}

#[derive(Debug, Deserialize)]
pub struct NextTimeFrameQuery {
    pub current: String,
    pub set: Option<String>,
}

#[derive(Debug, Serialize)]
struct NextTimeFrameBody {
    current: String,
    next: String,
}

/// Cycling endpoint for the toggle control: successor of `current` within
/// the requested ordered set, wrapping at the end. Out-of-set tokens are a
/// bad request, not a silent fallback.
pub async fn get_next_time_frame(query: NextTimeFrameQuery) -> Result<impl warp::Reply, Rejection> {
    debug!(
        "Handling next-time-frame request: current={}, set={:?}",
        query.current, query.set
    );

    let set = query.set.as_deref().unwrap_or("no_merge");
    let (current, next) = match set {
        "old" => {
            let current: TimeFrameOld = query.current.parse().map_err(|e: InvalidTimeFrame| {
                warp::reject::custom(ApiError::bad_request(e.to_string()))
            })?;
            let next = next_time_frame_old(current)
                .map_err(|e| warp::reject::custom(ApiError::bad_request(e.to_string())))?;
            (current.to_string(), next.to_string())
        }
        "no_merge" => {
            let current: TimeFrame = query.current.parse().map_err(|e: InvalidTimeFrame| {
                warp::reject::custom(ApiError::bad_request(e.to_string()))
            })?;
            let next = next_time_frame_no_merge(current)
                .map_err(|e| warp::reject::custom(ApiError::bad_request(e.to_string())))?;
            (current.to_string(), next.to_string())
        }
        other => {
            return Err(warp::reject::custom(ApiError::bad_request(format!(
                "unknown time frame set: {}",
                other
            ))))
        }
    };

    Ok(warp::reply::json(&NextTimeFrameBody { current, next }))
}
