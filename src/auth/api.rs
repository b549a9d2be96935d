//! Authentication API Endpoints
//! Mission: Provide register, login, refresh and profile endpoints

use crate::api::DetailResponse;
use crate::auth::{
    middleware::{require_access, AuthenticatedUser, BearerToken},
    models::{AccessResponse, CredentialsRequest, Profile, TokenPair},
    service::{AuthError, CredentialService, Result},
};
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use tracing::error;

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<CredentialService>,
}

impl AuthState {
    pub fn new(service: Arc<CredentialService>) -> Self {
        Self { service }
    }
}

/// Routes of the user-auth service
pub fn router(state: AuthState) -> Router {
    let protected_routes = Router::new()
        .route("/profile", get(profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_access));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .merge(protected_routes)
        .with_state(state)
}

/// Register endpoint - POST /register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<DetailResponse>)> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    run_blocking(move || state.service.register(&username, &password)).await?;

    Ok((
        StatusCode::CREATED,
        Json(DetailResponse::new("User registered successfully")),
    ))
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<TokenPair>> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let pair = run_blocking(move || state.service.authenticate(&username, &password)).await?;
    Ok(Json(pair))
}

/// Refresh endpoint - POST /refresh (refresh token as bearer)
pub async fn refresh(
    State(state): State<AuthState>,
    BearerToken(token): BearerToken,
) -> Result<Json<AccessResponse>> {
    let access = state.service.refresh(&token)?;
    Ok(Json(AccessResponse { access }))
}

/// Profile endpoint - GET /profile (access token as bearer)
pub async fn profile(
    State(state): State<AuthState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Json<Profile>> {
    let profile = run_blocking(move || state.service.get_profile(user_id)).await?;
    Ok(Json(profile))
}

/// bcrypt and SQLite both block; keep them off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(anyhow::Error::new(e).context("Auth task panicked")))?
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Validation | AuthError::Conflict => StatusCode::BAD_REQUEST,
            AuthError::Authentication | AuthError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Internal(e) => {
                error!("Auth internal error: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(DetailResponse::new(self.to_string()))).into_response()
    }
}
