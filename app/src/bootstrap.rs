use crate::config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load `.env` and the runtime config.
pub fn init_foundation() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let config = AppConfig::load()?;
    tracing::info!(
        port = config.server_port,
        display_size = config.render.display_size,
        oversample = config.render.oversample,
        level = %config.error_correction,
        logo_scale = config.render.composition.logo_scale,
        "Configuration loaded"
    );
    Ok(config)
}
