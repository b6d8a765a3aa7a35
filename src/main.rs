use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracktiles::config::{load_config, Config};
use tracktiles::convert::{DockerTippecanoe, TileConverter};
use tracktiles::history::{HistoryProvider, HttpHistoryProvider};
use tracktiles::registry::ChartRegistry;
use tracktiles::track::QuerySpec;
use tracktiles::web::{run_server, AppState};

#[derive(Parser)]
#[command(name = "tracktiles")]
#[command(about = "Vessel track tile-archive server", long_about = None)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracktiles=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match resolve_config_path(cli.config) {
        Some(path) => {
            info!(config_path = %path.display(), "Loading configuration");
            load_config(&path)?
        }
        None => {
            warn!("No config file found, using defaults");
            serde_yaml::from_str::<Config>("{}")?
        }
    };

    let chart_dir = config.chart_dir();
    tokio::fs::create_dir_all(&chart_dir).await?;
    info!(chart_dir = %chart_dir.display(), "Chart directory ready");

    let provider: Option<Arc<dyn HistoryProvider>> = config.history.as_ref().map(|h| {
        Arc::new(HttpHistoryProvider::new(h.url.clone(), h.context.clone()))
            as Arc<dyn HistoryProvider>
    });
    if provider.is_none() {
        warn!("No history service configured, track generation will be unavailable");
    }

    let query_spec = config
        .history
        .as_ref()
        .map(|h| QuerySpec {
            path: h.path.clone(),
            aggregate: h.aggregate.clone(),
        })
        .unwrap_or_default();

    let converter: Arc<dyn TileConverter> = Arc::new(DockerTippecanoe::new(
        config.converter.docker_image.clone(),
        chart_dir.clone(),
    ));

    let registry = Arc::new(ChartRegistry::new(chart_dir.clone()));
    registry.rescan().await?;

    let state = Arc::new(AppState {
        chart_dir,
        registry,
        provider,
        converter,
        query_spec,
        max_zoom: config.converter.max_zoom,
    });

    run_server(state, &config.web.listen).await?;
    Ok(())
}

fn resolve_config_path(explicit_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path);
    }

    if let Some(home_dir) = dirs::home_dir() {
        let user_config = home_dir.join(".config/tracktiles/config.yml");
        if user_config.exists() {
            return Some(user_config);
        }
    }

    let system_config = PathBuf::from("/etc/tracktiles/config.yml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}
