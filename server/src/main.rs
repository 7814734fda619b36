//! Contacts API server.
//!
//! Run from repo root: `cargo run -p contacts-server`
//! Settings come from the environment (and `.env`); see `contacts_api::Settings`.

use contacts_api::{app, state_from_settings, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("contacts_api=info,contacts_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(storage = ?settings.storage, prefix = %settings.api_prefix, "starting");
    let state = state_from_settings(&settings);
    let router = app(state, &settings.api_prefix);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("contacts API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
