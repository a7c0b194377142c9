#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use crochet_planner::{JsonPresetStore, Planner, RuntimeConfig, http_api, logging};

    let config = RuntimeConfig::from_env()?;
    logging::init_tracing(&config.log_level);

    let presets = JsonPresetStore::new(&config.presets_path);
    tracing::info!(
        addr = %config.http_addr,
        presets = %config.presets_path.display(),
        "crochet planner HTTP API listening"
    );
    let state = http_api::AppState::new(Planner::default(), presets);
    http_api::serve(config.http_addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
