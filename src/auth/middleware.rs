//! Authentication Middleware
//! Mission: Pull bearer tokens off requests and guard access-token routes

use crate::{api::DetailResponse, auth::api::AuthState};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// Raw bearer token from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = BearerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        BearerError::MissingToken
                    } else {
                        BearerError::InvalidFormat
                    }
                })?;

        Ok(Self(bearer.token().to_string()))
    }
}

/// Subject of a validated access token, stored in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub i64);

/// Rejects requests without a valid access token
pub async fn require_access(
    State(state): State<AuthState>,
    BearerToken(token): BearerToken,
    mut req: Request,
    next: Next,
) -> Response {
    match state.service.authorize(&token) {
        Ok(user_id) => {
            req.extensions_mut().insert(AuthenticatedUser(user_id));
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Bearer extraction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerError {
    MissingToken,
    InvalidFormat,
}

impl IntoResponse for BearerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            BearerError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing Authorization Header"),
            BearerError::InvalidFormat => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Bad Authorization header. Expected 'Authorization: Bearer <JWT>'",
            ),
        };

        (status, Json(DetailResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};

    async fn extract(req: HttpRequest<Body>) -> Result<BearerToken, BearerError> {
        let (mut parts, _) = req.into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[test]
    fn test_bearer_error_responses() {
        let missing = BearerError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let bad = BearerError::InvalidFormat.into_response();
        assert_eq!(bad.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_extracts_bearer_token() {
        let req = HttpRequest::builder()
            .header("Authorization", "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();

        let BearerToken(token) = extract(req).await.unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[tokio::test]
    async fn test_missing_header() {
        let req = HttpRequest::builder().body(Body::empty()).unwrap();
        assert_eq!(extract(req).await.unwrap_err(), BearerError::MissingToken);
    }

    #[tokio::test]
    async fn test_wrong_scheme() {
        let req = HttpRequest::builder()
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract(req).await.unwrap_err(), BearerError::InvalidFormat);
    }
}
