//! notes-api - note CRUD service with soft deletes

use anyhow::{Context, Result};
use clap::Parser;
use notes_auth_api::{
    api,
    config::{load_env, NotesArgs},
    init_tracing,
    notes::{self, NoteStore, NotesState},
    shutdown_signal,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = NotesArgs::parse().into_config();

    let store = Arc::new(NoteStore::new(&config.database_path)?);
    info!("📝 Notes store initialized at: {}", config.database_path.display());

    let app = api::finish(notes::router(NotesState::new(store)));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("🎯 notes-api listening on {}", config.bind);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    Ok(())
}
