use chrono::{DateTime, Duration, Utc};

use super::resolution::Resolution;

/// One contiguous sub-interval `[from, to)` of a track request range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Partition `[start, end)` into consecutive windows sized by the
/// resolution's duration. The final window is truncated to `end`, so
/// the windows cover the range exactly with no gaps or overlaps. A
/// zero-length (or inverted) range yields no windows.
pub fn segment_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    resolution: Resolution,
) -> Vec<TimeWindow> {
    let duration = Duration::milliseconds(resolution.duration_ms());
    let mut windows = Vec::new();
    let mut cursor = start;

    while cursor < end {
        let window_end = std::cmp::min(cursor + duration, end);
        windows.push(TimeWindow {
            from: cursor,
            to: window_end,
        });
        cursor = window_end;
    }

    windows
}
