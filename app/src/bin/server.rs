//! Server binary: serves the studio page and the generation API.

use tracing_subscriber::EnvFilter;

use qr_logo_studio_lib::app::SharedState;
use qr_logo_studio_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting QR Logo Studio");

    let config = qr_logo_studio_lib::init_foundation()?;
    let state = SharedState::new(config);

    let server_state = state.clone();
    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(server_state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    tracing::info!(
        port = state.server_port(),
        "Server running. Press Ctrl+C to stop."
    );

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("Shutting down...");
            state.generations().cancel_all();
            state.logo_uploads().cancel_all();
            state.shutdown_token().cancel();
            let _ = server_handle.await;
        }
        _ = &mut server_handle => {
            tracing::warn!("Server stopped unexpectedly");
        }
    }

    Ok(())
}
