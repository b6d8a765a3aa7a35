use std::path::Path;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::convert::TileConverter;
use crate::track::FeatureCollection;

const STAGING_EXTENSION: &str = ".geojson";
const ARCHIVE_EXTENSION: &str = ".pmtiles";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to write staging file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize feature collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of an archive build. `filename` is the converted archive
/// on success, or the staged GeoJSON file when conversion failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveResult {
    pub filename: String,
    pub feature_count: usize,
}

/// Writes the feature collection to a staging file and drives the
/// external tiling conversion.
pub struct ArchiveBuilder<'a> {
    chart_dir: &'a Path,
    converter: &'a dyn TileConverter,
    max_zoom: u8,
}

impl<'a> ArchiveBuilder<'a> {
    pub fn new(chart_dir: &'a Path, converter: &'a dyn TileConverter, max_zoom: u8) -> Self {
        Self {
            chart_dir,
            converter,
            max_zoom,
        }
    }

    /// Stage the collection, convert it, and clean up.
    ///
    /// On conversion failure the staging file is kept and its name is
    /// returned instead, so the caller still has usable output; only a
    /// staging-write failure is a hard error.
    pub async fn build(
        &self,
        collection: &FeatureCollection,
        start: &str,
        end: &str,
    ) -> Result<ArchiveResult, ArchiveError> {
        let staging_name = staging_filename(start, end);
        let staging_path = self.chart_dir.join(&staging_name);

        let body = serde_json::to_string_pretty(collection)?;
        tokio::fs::write(&staging_path, body).await?;

        info!(
            path = %staging_path.display(),
            features = collection.len(),
            "Wrote staged track GeoJSON"
        );

        let archive_name = staging_name.replace(STAGING_EXTENSION, ARCHIVE_EXTENSION);

        match self
            .converter
            .convert(&staging_name, &archive_name, self.max_zoom)
            .await
        {
            Ok(_) => {
                // Staging file is only a conversion input; drop it.
                // Removal failure is not worth failing the run over.
                if let Err(e) = tokio::fs::remove_file(&staging_path).await {
                    debug!(path = %staging_path.display(), error = %e, "Could not remove staging file");
                } else {
                    debug!(path = %staging_path.display(), "Removed staging file");
                }
                Ok(ArchiveResult {
                    filename: archive_name,
                    feature_count: collection.len(),
                })
            }
            Err(e) => {
                error!(error = %e, "Tile conversion failed, keeping staged GeoJSON");
                Ok(ArchiveResult {
                    filename: staging_name,
                    feature_count: collection.len(),
                })
            }
        }
    }
}

/// Staging filename derived from the request's start/end timestamps.
/// Colons are unsafe in filenames and are replaced. Two identical
/// concurrent requests share a name; they also produce identical
/// content, so the collision is accepted.
fn staging_filename(start: &str, end: &str) -> String {
    format!(
        "track_{}_to_{}{STAGING_EXTENSION}",
        start.replace(':', "-"),
        end.replace(':', "-")
    )
}
