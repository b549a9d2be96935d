//! Credential & Token Service
//! Mission: Register users, verify credentials, issue and check bearer tokens
//!
//! Tokens are stateless: there is no revocation list, so a refresh or access
//! token stays usable until its own `exp` even after a newer one is issued.

use crate::auth::{
    jwt::JwtHandler,
    models::{Profile, TokenKind, TokenPair},
    password::PasswordHasher,
    user_store::{InsertOutcome, UserStore},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username and password required")]
    Validation,

    #[error("Username already exists")]
    Conflict,

    /// Same message for unknown user and wrong password.
    #[error("Invalid credentials")]
    Authentication,

    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("User not found")]
    NotFound,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub struct CredentialService {
    users: Arc<UserStore>,
    jwt: Arc<JwtHandler>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialService {
    pub fn new(
        users: Arc<UserStore>,
        jwt: Arc<JwtHandler>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self { users, jwt, hasher }
    }

    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation);
        }

        if self.users.get_user_by_username(username)?.is_some() {
            return Err(AuthError::Conflict);
        }

        let digest = self.hasher.hash(password)?;
        match self.users.insert_user(username, &digest)? {
            InsertOutcome::Created(user) => {
                info!("🔐 Registered user {} ({})", user.username, user.id);
                Ok(())
            }
            // Lost a race with a concurrent registration
            InsertOutcome::UsernameTaken => Err(AuthError::Conflict),
        }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<TokenPair> {
        let Some(user) = self.users.get_user_by_username(username)? else {
            warn!("❌ Failed login attempt: {}", username);
            return Err(AuthError::Authentication);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!("❌ Failed login attempt: {}", username);
            return Err(AuthError::Authentication);
        }

        let pair = TokenPair {
            access: self.jwt.issue(user.id, TokenKind::Access)?,
            refresh: self.jwt.issue(user.id, TokenKind::Refresh)?,
        };

        info!("✅ Login successful: {} ({})", user.username, user.id);
        Ok(pair)
    }

    /// Mint a fresh access token from a refresh token. The refresh token is
    /// neither rotated nor invalidated.
    pub fn refresh(&self, refresh_token: &str) -> Result<String> {
        let user_id = self.verify(refresh_token, TokenKind::Refresh)?;
        Ok(self.jwt.issue(user_id, TokenKind::Access)?)
    }

    pub fn authorize(&self, access_token: &str) -> Result<i64> {
        self.verify(access_token, TokenKind::Access)
    }

    pub fn get_profile(&self, user_id: i64) -> Result<Profile> {
        self.users
            .get_user_by_id(user_id)?
            .map(|user| Profile::from_user(&user))
            .ok_or(AuthError::NotFound)
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<i64> {
        let claims = self.jwt.validate(token, kind).map_err(|e| {
            warn!("Rejected {} token: {:#}", kind.as_str(), e);
            AuthError::TokenInvalid
        })?;

        claims.user_id().ok_or(AuthError::TokenInvalid)
    }
}
