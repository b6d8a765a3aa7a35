use std::path::Path;

use thiserror::Error;

use super::types::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    let config: Config = serde_yaml::from_str(&yaml)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if let Some(history) = &config.history {
        if history.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "history.url must not be empty".to_string(),
            ));
        }
    }
    if config.converter.max_zoom == 0 {
        return Err(ConfigError::Validation(
            "converter.max_zoom must be at least 1".to_string(),
        ));
    }
    Ok(())
}
