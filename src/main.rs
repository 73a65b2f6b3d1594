//! Server binary: bind the upload/report router and serve it.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use docucheck::{config, upload};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let upload_dir = config::upload_dir();
    tokio::fs::create_dir_all(&upload_dir).await?;

    let bind = std::env::var("DOCUCHECK_BIND").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let addr: SocketAddr = bind.parse()?;

    let app = upload::router(upload_dir.clone());

    tracing::info!(
        %addr,
        upload_dir = %upload_dir.display(),
        version = config::APP_VERSION,
        "starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
