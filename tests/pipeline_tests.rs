use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use tracktiles::convert::{ConvertError, ConvertOutput, TileConverter};
use tracktiles::history::{HistoryError, HistoryProvider, HistoryQuery, PositionRow};
use tracktiles::pipeline::{PipelineError, RawTrackRequest, TrackPipeline, TrackRequest};
use tracktiles::track::{assemble, segment_range, QuerySpec, Resolution};

fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// Returns `count` continuous samples (10s apart) from each window's
/// start, except for windows listed in `failing`, which reject.
struct ScriptedHistory {
    samples_per_window: usize,
    failing_window_starts: Vec<DateTime<Utc>>,
    queries: Mutex<Vec<HistoryQuery>>,
}

impl ScriptedHistory {
    fn new(samples_per_window: usize, failing_window_starts: Vec<DateTime<Utc>>) -> Self {
        Self {
            samples_per_window,
            failing_window_starts,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl HistoryProvider for ScriptedHistory {
    async fn query(&self, query: &HistoryQuery) -> Result<Vec<PositionRow>, HistoryError> {
        self.queries.lock().unwrap().push(query.clone());

        if self.failing_window_starts.contains(&query.from) {
            return Err(HistoryError::Decode("scripted failure".to_string()));
        }

        Ok((0..self.samples_per_window)
            .map(|i| PositionRow {
                timestamp: query.from + Duration::seconds(i as i64 * 10),
                position: Some([4.90 + i as f64 * 0.01, 52.30]),
            })
            .collect())
    }
}

/// Converter double: either creates the output file and succeeds, or
/// fails with a canned exit code.
struct ScriptedConverter {
    chart_dir: PathBuf,
    exit_code: i32,
}

#[async_trait]
impl TileConverter for ScriptedConverter {
    async fn convert(
        &self,
        _input_file: &str,
        output_file: &str,
        _max_zoom: u8,
    ) -> Result<ConvertOutput, ConvertError> {
        if self.exit_code == 0 {
            std::fs::write(self.chart_dir.join(output_file), b"pmtiles").unwrap();
            Ok(ConvertOutput::default())
        } else {
            Err(ConvertError::Failed {
                code: Some(self.exit_code),
                stderr: "scripted failure".to_string(),
            })
        }
    }
}

fn pipeline<'a>(
    provider: Option<&'a dyn HistoryProvider>,
    converter: &'a dyn TileConverter,
    chart_dir: &'a Path,
    query_spec: &'a QuerySpec,
) -> TrackPipeline<'a> {
    TrackPipeline {
        provider,
        converter,
        chart_dir,
        query_spec,
        max_zoom: 17,
    }
}

#[tokio::test]
async fn failed_window_is_skipped_and_later_windows_still_contribute() {
    let start = utc("2024-01-01T00:00:00Z");
    let windows = segment_range(start, utc("2024-01-01T03:00:00Z"), Resolution::Hour);
    assert_eq!(windows.len(), 3);

    let provider = ScriptedHistory::new(5, vec![windows[1].from]);
    let collection = assemble(&provider, &windows, Resolution::Hour, &QuerySpec::default()).await;

    assert_eq!(collection.len(), 2);
    assert_eq!(
        collection.features[0].properties.start_time,
        windows[0].from.to_rfc3339()
    );
    assert_eq!(
        collection.features[1].properties.start_time,
        windows[2].from.to_rfc3339()
    );
    // All three windows were still queried, in order.
    assert_eq!(provider.query_count(), 3);
}

#[tokio::test]
async fn conversion_failure_falls_back_to_staged_file() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedHistory::new(5, vec![]);
    let converter = ScriptedConverter {
        chart_dir: dir.path().to_path_buf(),
        exit_code: 137,
    };
    let spec = QuerySpec::default();

    let request = TrackRequest::parse(&RawTrackRequest {
        start_date: Some("2024-01-01T00:00:00Z".to_string()),
        end_date: Some("2024-01-01T01:00:00Z".to_string()),
        resolution: Some("hour".to_string()),
    })
    .unwrap();

    let result = pipeline(Some(&provider), &converter, dir.path(), &spec)
        .run(&request)
        .await
        .unwrap();

    assert!(result.filename.ends_with(".geojson"));
    assert!(dir.path().join(&result.filename).exists());
}

#[tokio::test]
async fn conversion_success_removes_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedHistory::new(5, vec![]);
    let converter = ScriptedConverter {
        chart_dir: dir.path().to_path_buf(),
        exit_code: 0,
    };
    let spec = QuerySpec::default();

    let request = TrackRequest::parse(&RawTrackRequest {
        start_date: Some("2024-01-01T00:00:00Z".to_string()),
        end_date: Some("2024-01-01T01:00:00Z".to_string()),
        resolution: Some("hour".to_string()),
    })
    .unwrap();

    let result = pipeline(Some(&provider), &converter, dir.path(), &spec)
        .run(&request)
        .await
        .unwrap();

    assert!(result.filename.ends_with(".pmtiles"));
    assert!(dir.path().join(&result.filename).exists());
    let staged = result.filename.replace(".pmtiles", ".geojson");
    assert!(!dir.path().join(staged).exists());
}

#[tokio::test]
async fn two_hour_request_yields_two_features_of_five_points() {
    let dir = tempfile::tempdir().unwrap();
    let provider = ScriptedHistory::new(5, vec![]);
    // Failing converter keeps the staged GeoJSON around for inspection.
    let converter = ScriptedConverter {
        chart_dir: dir.path().to_path_buf(),
        exit_code: 1,
    };
    let spec = QuerySpec::default();

    let request = TrackRequest::parse(&RawTrackRequest {
        start_date: Some("2024-01-01T00:00:00Z".to_string()),
        end_date: Some("2024-01-01T02:00:00Z".to_string()),
        resolution: Some("hour".to_string()),
    })
    .unwrap();

    let result = pipeline(Some(&provider), &converter, dir.path(), &spec)
        .run(&request)
        .await
        .unwrap();

    assert_eq!(result.feature_count, 2);
    assert_eq!(provider.query_count(), 2);

    let staged = std::fs::read_to_string(dir.path().join(&result.filename)).unwrap();
    let geojson: serde_json::Value = serde_json::from_str(&staged).unwrap();
    assert_eq!(geojson["type"], "FeatureCollection");
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    for feature in features {
        assert_eq!(feature["properties"]["pointCount"], 5);
        assert_eq!(feature["properties"]["resolution"], "hour");
        assert_eq!(feature["geometry"]["type"], "MultiLineString");
        assert_eq!(
            feature["geometry"]["coordinates"][0].as_array().unwrap().len(),
            5
        );
    }
}

#[tokio::test]
async fn missing_history_provider_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let converter = ScriptedConverter {
        chart_dir: dir.path().to_path_buf(),
        exit_code: 0,
    };
    let spec = QuerySpec::default();

    let request = TrackRequest::parse(&RawTrackRequest {
        start_date: Some("2024-01-01T00:00:00Z".to_string()),
        end_date: Some("2024-01-01T01:00:00Z".to_string()),
        resolution: Some("hour".to_string()),
    })
    .unwrap();

    let err = pipeline(None, &converter, dir.path(), &spec)
        .run(&request)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::HistoryUnavailable));

    // Fails before any staging output is written.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn windows_with_single_samples_are_omitted() {
    let start = utc("2024-01-01T00:00:00Z");
    let windows = segment_range(start, utc("2024-01-01T02:00:00Z"), Resolution::Hour);

    let provider = ScriptedHistory::new(1, vec![]);
    let collection = assemble(&provider, &windows, Resolution::Hour, &QuerySpec::default()).await;

    assert!(collection.is_empty());
}
