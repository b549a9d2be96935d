//! User Storage
//! Mission: Store user accounts in a single SQLite table

use crate::auth::models::User;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of an insert that may collide on `username`
#[derive(Debug)]
pub enum InsertOutcome {
    Created(User),
    UsernameTaken,
}

/// User storage with SQLite backend
pub struct UserStore {
    db_path: PathBuf,
}

impl UserStore {
    /// Create a new user store and initialize database
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open {}", self.db_path.display()))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Initialize database schema
    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create users table")?;

        Ok(())
    }

    /// Get user by username (exact match)
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.connect()?;

        conn.query_row(
            "SELECT id, username, password FROM users WHERE username = ?1",
            params![username],
            row_to_user,
        )
        .optional()
        .context("Failed to look up user by username")
    }

    /// Get user by id
    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let conn = self.connect()?;

        conn.query_row(
            "SELECT id, username, password FROM users WHERE id = ?1",
            params![id],
            row_to_user,
        )
        .optional()
        .context("Failed to look up user by id")
    }

    /// Insert a user with an already hashed password.
    ///
    /// The UNIQUE constraint decides collisions, so two concurrent inserts of
    /// the same username cannot both succeed.
    pub fn insert_user(&self, username: &str, password_hash: &str) -> Result<InsertOutcome> {
        let conn = self.connect()?;

        let inserted = conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![username, password_hash],
        );

        match inserted {
            Ok(_) => {
                let user = User {
                    id: conn.last_insert_rowid(),
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                };
                info!("✅ Created user: {} ({})", user.username, user.id);
                Ok(InsertOutcome::Created(user))
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Ok(InsertOutcome::UsernameTaken)
            }
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
    })
}
