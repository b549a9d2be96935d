//! Authentication Module
//! Mission: User registration and login with stateless access/refresh JWTs

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod user_store;

pub use api::{router, AuthState};
pub use jwt::JwtHandler;
pub use middleware::require_access;
pub use password::{BcryptHasher, PasswordHasher};
pub use service::{AuthError, CredentialService};
pub use user_store::UserStore;
