use serde::Serialize;

use super::sampler::LineSegment;

/// One window's worth of track, rendered as a GeoJSON Feature with a
/// MultiLineString geometry (one line per gap-broken segment).
#[derive(Debug, Clone, Serialize)]
pub struct TrackFeature {
    #[serde(rename = "type")]
    pub feature_type: &'static str,
    pub properties: TrackProperties,
    pub geometry: TrackGeometry,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackProperties {
    pub start_time: String,
    pub end_time: String,
    pub resolution: String,
    pub point_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackGeometry {
    #[serde(rename = "type")]
    pub geometry_type: &'static str,
    pub coordinates: Vec<LineSegment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: &'static str,
    pub features: Vec<TrackFeature>,
}

impl TrackFeature {
    pub fn new(properties: TrackProperties, lines: Vec<LineSegment>) -> Self {
        Self {
            feature_type: "Feature",
            properties,
            geometry: TrackGeometry {
                geometry_type: "MultiLineString",
                coordinates: lines,
            },
        }
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<TrackFeature>) -> Self {
        Self {
            collection_type: "FeatureCollection",
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
