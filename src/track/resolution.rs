use serde::{Deserialize, Serialize};

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Window size for track segmentation.
///
/// Month and year are fixed 30/365-day approximations rather than
/// calendar-aware durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Resolution {
    /// Parse a resolution label. Returns None for unknown labels;
    /// request validation turns that into a 400.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "hour" => Some(Resolution::Hour),
            "day" => Some(Resolution::Day),
            "week" => Some(Resolution::Week),
            "month" => Some(Resolution::Month),
            "year" => Some(Resolution::Year),
            _ => None,
        }
    }

    /// Parse a resolution label, falling back to Day for anything
    /// unrecognized so the calendar lookup stays total.
    pub fn parse_or_day(label: &str) -> Self {
        Self::parse(label).unwrap_or(Resolution::Day)
    }

    pub fn duration_ms(&self) -> i64 {
        match self {
            Resolution::Hour => HOUR_MS,
            Resolution::Day => DAY_MS,
            Resolution::Week => 7 * DAY_MS,
            Resolution::Month => 30 * DAY_MS,
            Resolution::Year => 365 * DAY_MS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Hour => "hour",
            Resolution::Day => "day",
            Resolution::Week => "week",
            Resolution::Month => "month",
            Resolution::Year => "year",
        }
    }
}
