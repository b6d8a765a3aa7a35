use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding chart archives and staged track files.
    #[serde(default)]
    pub chart_path: Option<PathBuf>,
    #[serde(default)]
    pub web: WebConfig,
    /// Absent means no historical-data service is configured; track
    /// generation then answers 503.
    #[serde(default)]
    pub history: Option<HistoryConfig>,
    #[serde(default)]
    pub converter: ConverterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:8090".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Base URL of the history endpoint, e.g.
    /// `http://localhost:3000/signalk/v1/history`.
    pub url: String,
    #[serde(default = "default_context")]
    pub context: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_aggregate")]
    pub aggregate: String,
}

fn default_context() -> String {
    "vessels.self".to_string()
}

fn default_path() -> String {
    "navigation.position".to_string()
}

fn default_aggregate() -> String {
    "average".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default = "default_image")]
    pub docker_image: String,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
}

fn default_image() -> String {
    "versatiles/versatiles-tippecanoe:latest".to_string()
}

fn default_max_zoom() -> u8 {
    17
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            docker_image: default_image(),
            max_zoom: default_max_zoom(),
        }
    }
}

impl Config {
    /// Effective chart directory, falling back to a per-user data dir.
    pub fn chart_dir(&self) -> PathBuf {
        if let Some(path) = &self.chart_path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tracktiles/charts")
    }
}
