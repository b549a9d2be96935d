//! Notes & User-Auth Backend Library
//!
//! Two small REST services sharing one crate:
//! - `auth`: registration, login, access/refresh JWTs, profile
//! - `notes`: note CRUD with soft deletes
//!
//! The binaries in `src/bin/` wire these into running servers.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod notes;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing; `RUST_LOG` overrides the default filter
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notes_auth_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves when Ctrl-C is received
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown signal received");
}
