//! HTTP front end — the visitor-facing web server.
//!
//! Routes:
//! - `GET /`, `GET /home` — landing page and its source-tagging redirect
//! - `POST /update-ip`, `POST /log-click` — record a visit
//! - `GET /get-count`, `GET /get-data` — read the log back

pub mod error;
pub mod protocol;
pub mod routes;

use crate::config::ServeArgs;
use anyhow::{Context, Result};
use tokio::net::TcpListener;

pub use error::ApiError;
pub use routes::{router, AppState};

/// Bind and run the server until Ctrl-C.
pub async fn serve(args: ServeArgs) -> Result<()> {
    let addr = args.bind_addr()?;
    let store = args.store.store();
    let notifier = args
        .mail
        .notifier(store.clone())
        .context("Invalid mail configuration")?;

    let state = AppState::new(store, notifier, &args.public_dir);
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind visitlog server to {addr}"))?;

    tracing::info!(
        data_file = %args.store.data_file.display(),
        mail = args.mail.is_enabled(),
        "Server running on {addr}"
    );

    axum::serve(listener, axum::Router::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server encountered an unrecoverable error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
