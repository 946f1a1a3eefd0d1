//! Listener and graceful shutdown

use anyhow::{Context, Result};
use axum::Router;
use harbor_core::Config;

/// Serve until Ctrl+C or SIGTERM, letting in-flight requests finish.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        max_upload_mb = config.max_upload_size_mb,
        upload_dir = %config.upload_dir.display(),
        public_uploads_path = %config.public_uploads_path,
        environment = %config.environment,
        "Harbor listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on the first of SIGINT or SIGTERM.
///
/// # Panics
/// If the process cannot register the signal handlers at all.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutdown requested, draining connections");

    crate::telemetry::shutdown_telemetry().await;
}
