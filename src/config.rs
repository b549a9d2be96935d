//! Process configuration for both services.
//!
//! Values come from CLI flags, falling back to environment variables (which a
//! `.env` file may populate). Each binary turns its args into a validated
//! config struct once at startup and hands it to the constructors.

use anyhow::{ensure, Result};
use clap::Parser;
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest token lifetime accepted (one year, in seconds)
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Command-line / environment arguments of `user-auth-api`
#[derive(Debug, Parser)]
#[command(name = "user-auth-api")]
#[command(about = "User registration and login API issuing access and refresh tokens")]
pub struct AuthArgs {
    /// Address to listen on
    #[arg(long, env = "AUTH_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// SQLite database file holding the users table
    #[arg(long, env = "AUTH_DB_PATH", default_value = "users.db")]
    pub database_path: PathBuf,

    /// Secret used to sign tokens
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    pub jwt_secret_key: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "JWT_ACCESS_TOKEN_EXPIRES", default_value = "60")]
    pub access_token_ttl_secs: u64,

    /// Refresh token lifetime in seconds
    #[arg(long, env = "JWT_REFRESH_TOKEN_EXPIRES", default_value = "60")]
    pub refresh_token_ttl_secs: u64,

    /// bcrypt work factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub bind: SocketAddr,
    pub database_path: PathBuf,
    pub jwt_secret_key: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl AuthArgs {
    pub fn into_config(self) -> Result<AuthConfig> {
        ensure!(
            !self.jwt_secret_key.trim().is_empty(),
            "JWT_SECRET_KEY must not be empty"
        );
        ensure!(
            (1..=MAX_TOKEN_TTL_SECS).contains(&self.access_token_ttl_secs),
            "access token lifetime must be between 1 and {} seconds, got {}",
            MAX_TOKEN_TTL_SECS,
            self.access_token_ttl_secs
        );
        ensure!(
            (1..=MAX_TOKEN_TTL_SECS).contains(&self.refresh_token_ttl_secs),
            "refresh token lifetime must be between 1 and {} seconds, got {}",
            MAX_TOKEN_TTL_SECS,
            self.refresh_token_ttl_secs
        );
        ensure!(
            (4..=31).contains(&self.bcrypt_cost),
            "bcrypt cost must be between 4 and 31, got {}",
            self.bcrypt_cost
        );

        Ok(AuthConfig {
            bind: self.bind,
            database_path: self.database_path,
            jwt_secret_key: self.jwt_secret_key,
            access_token_ttl: Duration::from_secs(self.access_token_ttl_secs),
            refresh_token_ttl: Duration::from_secs(self.refresh_token_ttl_secs),
            bcrypt_cost: self.bcrypt_cost,
        })
    }
}

/// Command-line / environment arguments of `notes-api`
#[derive(Debug, Parser)]
#[command(name = "notes-api")]
#[command(about = "Note-taking CRUD API with soft deletes")]
pub struct NotesArgs {
    /// Address to listen on
    #[arg(long, env = "NOTES_BIND", default_value = "127.0.0.1:5001")]
    pub bind: SocketAddr,

    /// SQLite database file holding the notes table
    #[arg(long, env = "NOTES_DB_PATH", default_value = "note.db")]
    pub database_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct NotesConfig {
    pub bind: SocketAddr,
    pub database_path: PathBuf,
}

impl NotesArgs {
    pub fn into_config(self) -> NotesConfig {
        NotesConfig {
            bind: self.bind,
            database_path: self.database_path,
        }
    }
}

/// Load `.env` from the working directory (and parents) and from the crate root
pub fn load_env() {
    let _ = dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{models::TokenKind, JwtHandler};

    fn auth_args(extra: &[&str]) -> AuthArgs {
        let mut argv = vec!["user-auth-api", "--jwt-secret-key", "s3cret"];
        argv.extend_from_slice(extra);
        AuthArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_auth_flags_become_config() {
        let config = auth_args(&[
            "--bind",
            "0.0.0.0:9000",
            "--database-path",
            "/tmp/u.db",
            "--access-token-ttl-secs",
            "300",
            "--refresh-token-ttl-secs",
            "600",
            "--bcrypt-cost",
            "4",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.database_path, PathBuf::from("/tmp/u.db"));
        assert_eq!(config.jwt_secret_key, "s3cret");
        assert_eq!(config.access_token_ttl, Duration::from_secs(300));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(600));
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn test_blank_secret_rejected() {
        let args = AuthArgs::try_parse_from(["user-auth-api", "--jwt-secret-key", "  "]).unwrap();
        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_zero_lifetime_rejected() {
        assert!(auth_args(&["--access-token-ttl-secs", "0"])
            .into_config()
            .is_err());
        assert!(auth_args(&["--refresh-token-ttl-secs", "0"])
            .into_config()
            .is_err());
    }

    #[test]
    fn test_oversized_lifetime_rejected() {
        let huge = u64::MAX.to_string();
        assert!(auth_args(&["--access-token-ttl-secs", huge.as_str()])
            .into_config()
            .is_err());
        assert!(auth_args(&["--refresh-token-ttl-secs", huge.as_str()])
            .into_config()
            .is_err());

        let just_over = (MAX_TOKEN_TTL_SECS + 1).to_string();
        assert!(auth_args(&["--access-token-ttl-secs", just_over.as_str()])
            .into_config()
            .is_err());
    }

    #[test]
    fn test_longest_accepted_lifetime_still_issues_tokens() {
        let max = MAX_TOKEN_TTL_SECS.to_string();
        let config = auth_args(&[
            "--access-token-ttl-secs",
            max.as_str(),
            "--refresh-token-ttl-secs",
            max.as_str(),
        ])
        .into_config()
        .unwrap();

        let jwt = JwtHandler::new(
            &config.jwt_secret_key,
            config.access_token_ttl,
            config.refresh_token_ttl,
        );
        assert!(jwt.issue(1, TokenKind::Access).is_ok());
        assert!(jwt.issue(1, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        assert!(auth_args(&["--bcrypt-cost", "3"]).into_config().is_err());
        assert!(auth_args(&["--bcrypt-cost", "32"]).into_config().is_err());
    }

    #[test]
    fn test_notes_args() {
        let config = NotesArgs::try_parse_from(["notes-api", "--database-path", "n.db"])
            .unwrap()
            .into_config();
        assert_eq!(config.database_path, PathBuf::from("n.db"));
    }
}
