pub mod docker;

use async_trait::async_trait;
use thiserror::Error;

pub use docker::DockerTippecanoe;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// The converter binary/runtime could not be started at all.
    #[error("failed to spawn conversion process: {0}")]
    Spawn(#[source] std::io::Error),

    /// The conversion process ran but reported failure.
    #[error("conversion exited with {code:?}: {stderr}")]
    Failed {
        code: Option<i32>,
        stderr: String,
    },
}

/// Captured output of a successful conversion run.
#[derive(Debug, Default, Clone)]
pub struct ConvertOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Boundary to the external tiling conversion tool. Filenames are
/// relative to the chart directory; the implementation decides how to
/// expose that directory to the tool. Trait object so the archive
/// builder can be tested against canned exit results.
#[async_trait]
pub trait TileConverter: Send + Sync {
    async fn convert(
        &self,
        input_file: &str,
        output_file: &str,
        max_zoom: u8,
    ) -> Result<ConvertOutput, ConvertError>;
}
