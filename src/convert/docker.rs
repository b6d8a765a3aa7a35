use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};

use super::{ConvertError, ConvertOutput, TileConverter};

/// Runs tippecanoe inside a throwaway docker container, mounting the
/// chart directory at /data so input and output stay inside it.
pub struct DockerTippecanoe {
    image: String,
    chart_dir: PathBuf,
}

impl DockerTippecanoe {
    pub fn new(image: String, chart_dir: PathBuf) -> Self {
        Self { image, chart_dir }
    }
}

#[async_trait]
impl TileConverter for DockerTippecanoe {
    async fn convert(
        &self,
        input_file: &str,
        output_file: &str,
        max_zoom: u8,
    ) -> Result<ConvertOutput, ConvertError> {
        debug!(
            input = input_file,
            output = output_file,
            image = %self.image,
            "Converting with docker tippecanoe"
        );

        let mount = format!("{}:/data", self.chart_dir.display());
        let output = Command::new("docker")
            .args(["run", "-i", "--rm", "-v", &mount, &self.image])
            .args(["-o", &format!("/data/{output_file}")])
            .args(["-f", &format!("/data/{input_file}")])
            .arg(format!("-z{max_zoom}"))
            .output()
            .await
            .map_err(ConvertError::Spawn)?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            if !stdout.is_empty() {
                debug!(stdout = %stdout, "Conversion stdout");
            }
            Ok(ConvertOutput { stdout, stderr })
        } else {
            error!(
                code = ?output.status.code(),
                stderr = %stderr,
                "Conversion failed"
            );
            Err(ConvertError::Failed {
                code: output.status.code(),
                stderr,
            })
        }
    }
}
