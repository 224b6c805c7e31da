// src/time_frames.rs
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::hardforks::{LONDON_TIMESTAMP, MERGE_TIMESTAMP};

/// A selectable window over the dashboard's time series.
///
/// Canonical order is `m5 < h1 < d1 < d7 < d30 < since_burn < since_merge`;
/// the ordered constant arrays below preserve it for the cycling functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFrame {
    M5,
    H1,
    D1,
    D7,
    D30,
    SinceBurn,
    SinceMerge,
}

/// Time frames with a fixed numeric window, excluding the two "since X"
/// anchor frames. Display labels and window durations are total over this
/// enum by exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitedTimeFrame {
    M5,
    H1,
    D1,
    D7,
    D30,
}

/// The legacy vocabulary predating merge-aware time frames, where `"all"`
/// is a deprecated alias for `since_burn`. Kept for persisted preferences
/// and URL query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFrameOld {
    M5,
    H1,
    D1,
    D7,
    D30,
    All,
}

pub const TIME_FRAMES: [TimeFrame; 7] = [
    TimeFrame::M5,
    TimeFrame::H1,
    TimeFrame::D1,
    TimeFrame::D7,
    TimeFrame::D30,
    TimeFrame::SinceBurn,
    TimeFrame::SinceMerge,
];

pub const TIME_FRAMES_NO_MERGE: [TimeFrame; 6] = [
    TimeFrame::M5,
    TimeFrame::H1,
    TimeFrame::D1,
    TimeFrame::D7,
    TimeFrame::D30,
    TimeFrame::SinceBurn,
];

pub const LIMITED_TIME_FRAMES: [LimitedTimeFrame; 5] = [
    LimitedTimeFrame::M5,
    LimitedTimeFrame::H1,
    LimitedTimeFrame::D1,
    LimitedTimeFrame::D7,
    LimitedTimeFrame::D30,
];

pub const TIME_FRAMES_OLD: [TimeFrameOld; 6] = [
    TimeFrameOld::M5,
    TimeFrameOld::H1,
    TimeFrameOld::D1,
    TimeFrameOld::D7,
    TimeFrameOld::D30,
    TimeFrameOld::All,
];

/// A time-frame token outside the expected set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeFrame {
    pub token: String,
}

impl InvalidTimeFrame {
    pub fn new(token: impl Into<String>) -> Self {
        InvalidTimeFrame {
            token: token.into(),
        }
    }
}

impl fmt::Display for InvalidTimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid time frame: {}", self.token)
    }
}

impl std::error::Error for InvalidTimeFrame {}

impl TimeFrame {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFrame::M5 => "m5",
            TimeFrame::H1 => "h1",
            TimeFrame::D1 => "d1",
            TimeFrame::D7 => "d7",
            TimeFrame::D30 => "d30",
            TimeFrame::SinceBurn => "since_burn",
            TimeFrame::SinceMerge => "since_merge",
        }
    }

    /// Start of the window this frame selects, given the caller's clock.
    /// Limited frames look back from `now`; the anchor frames start at
    /// their hard fork.
    pub fn start_of_window(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match LimitedTimeFrame::try_from(self) {
            Ok(limited) => now - Duration::seconds(limited.duration_seconds()),
            Err(_) => match self {
                TimeFrame::SinceBurn => Utc.timestamp_opt(LONDON_TIMESTAMP, 0).unwrap(),
                TimeFrame::SinceMerge => Utc.timestamp_opt(MERGE_TIMESTAMP, 0).unwrap(),
                // Limited frames are handled above.
                _ => unreachable!(),
            },
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = InvalidTimeFrame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m5" => Ok(TimeFrame::M5),
            "h1" => Ok(TimeFrame::H1),
            "d1" => Ok(TimeFrame::D1),
            "d7" => Ok(TimeFrame::D7),
            "d30" => Ok(TimeFrame::D30),
            "since_burn" => Ok(TimeFrame::SinceBurn),
            "since_merge" => Ok(TimeFrame::SinceMerge),
            _ => Err(InvalidTimeFrame::new(s)),
        }
    }
}

impl LimitedTimeFrame {
    /// Short human-readable label shown on the time-frame control.
    pub fn display_label(self) -> &'static str {
        match self {
            LimitedTimeFrame::M5 => "5m",
            LimitedTimeFrame::H1 => "1h",
            LimitedTimeFrame::D1 => "1d",
            LimitedTimeFrame::D7 => "7d",
            LimitedTimeFrame::D30 => "30d",
        }
    }

    pub fn duration_seconds(self) -> i64 {
        match self {
            LimitedTimeFrame::M5 => 5 * 60,
            LimitedTimeFrame::H1 => 60 * 60,
            LimitedTimeFrame::D1 => 24 * 60 * 60,
            LimitedTimeFrame::D7 => 7 * 24 * 60 * 60,
            LimitedTimeFrame::D30 => 30 * 24 * 60 * 60,
        }
    }
}

impl From<LimitedTimeFrame> for TimeFrame {
    fn from(limited: LimitedTimeFrame) -> Self {
        match limited {
            LimitedTimeFrame::M5 => TimeFrame::M5,
            LimitedTimeFrame::H1 => TimeFrame::H1,
            LimitedTimeFrame::D1 => TimeFrame::D1,
            LimitedTimeFrame::D7 => TimeFrame::D7,
            LimitedTimeFrame::D30 => TimeFrame::D30,
        }
    }
}

impl TryFrom<TimeFrame> for LimitedTimeFrame {
    type Error = InvalidTimeFrame;

    fn try_from(time_frame: TimeFrame) -> Result<Self, Self::Error> {
        match time_frame {
            TimeFrame::M5 => Ok(LimitedTimeFrame::M5),
            TimeFrame::H1 => Ok(LimitedTimeFrame::H1),
            TimeFrame::D1 => Ok(LimitedTimeFrame::D1),
            TimeFrame::D7 => Ok(LimitedTimeFrame::D7),
            TimeFrame::D30 => Ok(LimitedTimeFrame::D30),
            other => Err(InvalidTimeFrame::new(other.as_str())),
        }
    }
}

impl TimeFrameOld {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFrameOld::M5 => "m5",
            TimeFrameOld::H1 => "h1",
            TimeFrameOld::D1 => "d1",
            TimeFrameOld::D7 => "d7",
            TimeFrameOld::D30 => "d30",
            TimeFrameOld::All => "all",
        }
    }
}

impl fmt::Display for TimeFrameOld {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeFrameOld {
    type Err = InvalidTimeFrame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m5" => Ok(TimeFrameOld::M5),
            "h1" => Ok(TimeFrameOld::H1),
            "d1" => Ok(TimeFrameOld::D1),
            "d7" => Ok(TimeFrameOld::D7),
            "d30" => Ok(TimeFrameOld::D30),
            "all" => Ok(TimeFrameOld::All),
            _ => Err(InvalidTimeFrame::new(s)),
        }
    }
}

/// Decode a legacy token into the current vocabulary. Total; `all` expands
/// to `since_burn`, everything else is identity. Never yields `SinceMerge`.
pub fn from_old_time_frame(old: TimeFrameOld) -> TimeFrame {
    match old {
        TimeFrameOld::M5 => TimeFrame::M5,
        TimeFrameOld::H1 => TimeFrame::H1,
        TimeFrameOld::D1 => TimeFrame::D1,
        TimeFrameOld::D7 => TimeFrame::D7,
        TimeFrameOld::D30 => TimeFrame::D30,
        TimeFrameOld::All => TimeFrame::SinceBurn,
    }
}

/// Encode back into the legacy vocabulary. `since_burn` collapses to `all`;
/// `since_merge` predates nothing in the legacy encoding and is rejected.
pub fn to_old_time_frame(time_frame: TimeFrame) -> Result<TimeFrameOld, InvalidTimeFrame> {
    match time_frame {
        TimeFrame::M5 => Ok(TimeFrameOld::M5),
        TimeFrame::H1 => Ok(TimeFrameOld::H1),
        TimeFrame::D1 => Ok(TimeFrameOld::D1),
        TimeFrame::D7 => Ok(TimeFrameOld::D7),
        TimeFrame::D30 => Ok(TimeFrameOld::D30),
        TimeFrame::SinceBurn => Ok(TimeFrameOld::All),
        TimeFrame::SinceMerge => Err(InvalidTimeFrame::new(TimeFrame::SinceMerge.as_str())),
    }
}

/// Successor of `current` within `ordered`, wrapping from the last element
/// back to the first. Membership is a checked precondition: an out-of-set
/// `current` is an `InvalidTimeFrame`, not a fallback.
pub fn next_in_cycle<T>(current: T, ordered: &[T]) -> Result<T, InvalidTimeFrame>
where
    T: Copy + PartialEq + fmt::Display,
{
    let index = ordered
        .iter()
        .position(|candidate| *candidate == current)
        .ok_or_else(|| InvalidTimeFrame::new(current.to_string()))?;
    Ok(ordered[(index + 1) % ordered.len()])
}

pub fn next_time_frame_no_merge(current: TimeFrame) -> Result<TimeFrame, InvalidTimeFrame> {
    next_in_cycle(current, &TIME_FRAMES_NO_MERGE)
}

pub fn next_time_frame_old(current: TimeFrameOld) -> Result<TimeFrameOld, InvalidTimeFrame> {
    next_in_cycle(current, &TIME_FRAMES_OLD)
}
