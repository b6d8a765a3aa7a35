use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

const ARCHIVE_SUFFIX: &str = ".pmtiles";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to scan chart directory: {0}")]
    Io(#[from] std::io::Error),
}

/// One tile archive discovered in the chart directory. Metadata is
/// derived from the filename only; reading the archive itself is the
/// tile server's job.
#[derive(Debug, Clone, Serialize)]
pub struct ChartEntry {
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub format: &'static str,
    #[serde(skip)]
    pub path: PathBuf,
}

/// Registry of known chart archives. Each scan builds a fresh
/// snapshot and swaps it in wholesale, so readers never observe a
/// partially updated listing.
pub struct ChartRegistry {
    chart_dir: PathBuf,
    snapshot: RwLock<Arc<Vec<ChartEntry>>>,
}

impl ChartRegistry {
    pub fn new(chart_dir: PathBuf) -> Self {
        Self {
            chart_dir,
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Current listing. Cheap; clones an Arc, never blocks on a scan.
    pub async fn snapshot(&self) -> Arc<Vec<ChartEntry>> {
        self.snapshot.read().await.clone()
    }

    /// Rescan the chart directory and replace the published snapshot.
    pub async fn rescan(&self) -> Result<usize, RegistryError> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.chart_dir).await?;

        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(chart) = chart_entry(name, &entry.path()) {
                debug!(identifier = %chart.identifier, "Found chart archive");
                entries.push(chart);
            }
        }

        entries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        let count = entries.len();

        *self.snapshot.write().await = Arc::new(entries);
        info!(count, dir = %self.chart_dir.display(), "Chart registry refreshed");
        Ok(count)
    }
}

fn chart_entry(file_name: &str, path: &Path) -> Option<ChartEntry> {
    let stem = file_name.strip_suffix(ARCHIVE_SUFFIX)?;
    Some(ChartEntry {
        identifier: stem.to_string(),
        name: stem.to_string(),
        description: format!("PMTiles chart {stem}"),
        format: "pmtiles",
        path: path.to_path_buf(),
    })
}
