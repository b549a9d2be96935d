//! user-auth-api - registration, login and token refresh service

use anyhow::{Context, Result};
use clap::Parser;
use notes_auth_api::{
    api,
    auth::{self, AuthState, BcryptHasher, CredentialService, JwtHandler, UserStore},
    config::{load_env, AuthArgs},
    init_tracing, shutdown_signal,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = AuthArgs::parse().into_config()?;

    let user_store = Arc::new(UserStore::new(&config.database_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(
        &config.jwt_secret_key,
        config.access_token_ttl,
        config.refresh_token_ttl,
    ));
    let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost));
    let service = Arc::new(CredentialService::new(user_store, jwt_handler, hasher));

    info!(
        "🔐 Authentication initialized at: {} (access {}s, refresh {}s)",
        config.database_path.display(),
        config.access_token_ttl.as_secs(),
        config.refresh_token_ttl.as_secs()
    );

    let app = api::finish(auth::router(AuthState::new(service)));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("🎯 user-auth-api listening on {}", config.bind);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    Ok(())
}
