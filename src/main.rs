use anyhow::Context;
use tracing::info;

use floedb_load::{router, AppState, ConnectionString};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let raw = std::env::var("FLOEDB_CONNECTION_STRING")
        .context("missing FLOEDB_CONNECTION_STRING environment variable")?;
    let connection =
        ConnectionString::parse(&raw).context("invalid FLOEDB_CONNECTION_STRING")?;

    let bind =
        std::env::var("FLOEDB_LOAD_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_owned());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(%bind, "load service listening");

    axum::serve(listener, router(AppState::new(connection)))
        .await
        .context("server exited")?;
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
