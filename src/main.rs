mod config;
mod error;
mod state;
mod routes;
mod handlers;
mod inference_service;
mod storage;
mod translate;
mod asr;
mod tts;
mod speech;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cascade_backend=debug,tower_http=debug")),
        )
        .init();

    let config = load_config();

    // Ensure directories exist
    let system_config = &config.system_config;
    std::fs::create_dir_all(system_config.upload_path())?;
    std::fs::create_dir_all(system_config.audio_output_path())?;
    info!(
        "Upload dir: {}, audio output dir: {}",
        system_config.upload_dir, system_config.audio_output_dir
    );

    // Model load failures abort startup
    let app_state = AppState::new(config.clone()).await?;
    info!("All models loaded, pipeline: German → English → Marathi");

    let app = routes::create_app(app_state);

    let addr = (system_config.host.as_str(), system_config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting server on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// First readable config among `CONFIG_PATH`, the working directory and the
/// executable's directory; built-in defaults otherwise.
fn load_config() -> Config {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    let config_paths: Vec<PathBuf> = vec![
        std::env::var("CONFIG_PATH").ok().map(PathBuf::from),
        Some(PathBuf::from("conf.yaml")),
        Some(PathBuf::from("conf.json")),
        Some(exe_dir.join("conf.yaml")),
    ]
    .into_iter()
    .flatten()
    .collect();

    for path in &config_paths {
        if !path.exists() {
            continue;
        }
        match Config::load(path) {
            Ok(cfg) => {
                info!("Loaded configuration from: {}", path.display());
                return cfg;
            }
            Err(e) => warn!("Failed to load config from {}: {:#}", path.display(), e),
        }
    }

    warn!("No usable config file found (tried {:?}), using defaults", config_paths);
    Config::default()
}
