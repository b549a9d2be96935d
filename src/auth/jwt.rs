//! JWT Token Handler
//! Mission: Issue and validate access/refresh tokens securely

use crate::auth::models::{Claims, TokenKind};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key and per-kind lifetimes
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Issue a token of the given kind for a user
    pub fn issue(&self, user_id: i64, kind: TokenKind) -> Result<String> {
        self.issue_at(user_id, kind, Utc::now())
    }

    /// Issue a token as if the clock read `now`
    pub fn issue_at(&self, user_id: i64, kind: TokenKind, now: DateTime<Utc>) -> Result<String> {
        let ttl = chrono::Duration::from_std(self.ttl(kind)).context("Token lifetime too large")?;
        let expiration = now.checked_add_signed(ttl).context("Invalid timestamp")?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
        };

        debug!(
            "Generating {} JWT for user {}, expires in {}s",
            kind.as_str(),
            user_id,
            self.ttl(kind).as_secs()
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Validate signature, expiry and kind; return the claims
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let decoded = decode::<Claims>(token, &self.decoding_key, &validation)
            .context("Invalid or expired token")?;

        if decoded.claims.kind != expected {
            anyhow::bail!(
                "Only {} tokens are allowed, got {}",
                expected.as_str(),
                decoded.claims.kind.as_str()
            );
        }

        debug!("Validated {} JWT for user {}", expected.as_str(), decoded.claims.sub);

        Ok(decoded.claims)
    }
}
