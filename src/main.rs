use anyhow::Result;
use site_lang::{config, server};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("site_lang=info".parse()?),
        )
        .init();

    let config = config::Config::from_env()?;

    let registry = Arc::new(config.load_registry()?);
    info!(
        "Serving {} languages (default: {})",
        registry.len(),
        registry.default_language()
    );

    let app = server::build_app(&config, registry)?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("✓ Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
