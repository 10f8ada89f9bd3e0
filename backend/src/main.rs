use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use handyman_backend::config::AppConfig;
use handyman_backend::identity::SessionChange;
use handyman_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    let state = initialize_backend(&config).await?;

    let mut changes = state.sessions.subscribe();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(SessionChange::SignedIn(identity)) => info!("Identity signed in: {}", identity.uid),
                Ok(SessionChange::SignedOut(identity)) => info!("Identity signed out: {}", identity.uid),
                Err(RecvError::Lagged(skipped)) => warn!("Missed {} session changes", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let app = create_router(state, &config)?;

    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
