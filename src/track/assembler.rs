use tracing::debug;

use crate::history::{HistoryProvider, HistoryQuery};

use super::geojson::{FeatureCollection, TrackFeature, TrackProperties};
use super::resolution::Resolution;
use super::sampler::build_line_segments;
use super::segment::TimeWindow;

/// Fixed sub-sampling resolution for position queries, in seconds.
const SAMPLING_RESOLUTION_SECONDS: u32 = 10;

/// Which historical path to sample and how to aggregate it.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub path: String,
    pub aggregate: String,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            path: "navigation.position".to_string(),
            aggregate: "average".to_string(),
        }
    }
}

/// Query each window in order and aggregate the resulting line
/// segments into a feature collection.
///
/// Windows are processed strictly sequentially so the feature list
/// reflects chronological progression and the history service sees at
/// most one in-flight query per run. A query failure on one window is
/// logged and contributes nothing; remaining windows still run.
/// Windows with no usable segments emit no feature.
pub async fn assemble(
    provider: &dyn HistoryProvider,
    windows: &[TimeWindow],
    resolution: Resolution,
    spec: &QuerySpec,
) -> FeatureCollection {
    let mut features = Vec::new();

    for window in windows {
        let query = HistoryQuery {
            from: window.from,
            to: window.to,
            resolution_seconds: SAMPLING_RESOLUTION_SECONDS,
            path: spec.path.clone(),
            aggregate: spec.aggregate.clone(),
        };

        let rows = match provider.query(&query).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(
                    window_start = %window.from.to_rfc3339(),
                    error = %e,
                    "History query failed for window, continuing"
                );
                continue;
            }
        };

        if rows.is_empty() {
            continue;
        }

        let lines = build_line_segments(&rows);
        if lines.is_empty() {
            continue;
        }

        features.push(TrackFeature::new(
            TrackProperties {
                start_time: window.from.to_rfc3339(),
                end_time: window.to.to_rfc3339(),
                resolution: resolution.label().to_string(),
                point_count: rows.len(),
            },
            lines,
        ));
    }

    FeatureCollection::new(features)
}
