use chrono::{DateTime, Utc};

use crate::history::PositionRow;

/// Gap between consecutive samples beyond which the track is split
/// into separate polylines. A longer silence means the vessel was
/// stationary or disconnected, and a straight interpolated line would
/// misrepresent the path.
const MAX_GAP_MS: i64 = 2 * 60 * 1000;

/// An ordered polyline of `[longitude, latitude]` points.
pub type LineSegment = Vec<[f64; 2]>;

/// Build gap-broken line segments from time-ordered position rows.
///
/// Rows with a missing or non-finite coordinate are skipped entirely;
/// they neither break nor extend the current segment. Segments with
/// fewer than two points are dropped.
pub fn build_line_segments(rows: &[PositionRow]) -> Vec<LineSegment> {
    let mut segments: Vec<LineSegment> = Vec::new();
    let mut current: LineSegment = Vec::new();
    let mut last_timestamp: Option<DateTime<Utc>> = None;

    for row in rows {
        let Some([longitude, latitude]) = row.position else {
            continue;
        };
        if !longitude.is_finite() || !latitude.is_finite() {
            continue;
        }

        if let Some(last) = last_timestamp {
            if (row.timestamp - last).num_milliseconds() > MAX_GAP_MS {
                close_segment(&mut segments, &mut current);
            }
        }

        current.push([longitude, latitude]);
        last_timestamp = Some(row.timestamp);
    }

    close_segment(&mut segments, &mut current);
    segments
}

fn close_segment(segments: &mut Vec<LineSegment>, current: &mut LineSegment) {
    if current.len() > 1 {
        segments.push(std::mem::take(current));
    } else {
        current.clear();
    }
}
