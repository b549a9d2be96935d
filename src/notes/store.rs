//! Note Storage
//! Mission: Persist notes in SQLite; deletes only change the status column

use crate::notes::models::{NewNote, Note, NoteStatus};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Note storage with SQLite backend
pub struct NoteStore {
    db_path: PathBuf,
}

impl NoteStore {
    /// Create a new note store and initialize database
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

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                content TEXT,
                status TEXT NOT NULL DEFAULT 'active'
            )",
            [],
        )
        .context("Failed to create notes table")?;

        Ok(())
    }

    /// Active notes ordered by id, optionally narrowed to a single id
    pub fn list_active(&self, id: Option<i64>) -> Result<Vec<Note>> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT id, title, content, status FROM notes
             WHERE status = ?1 AND (?2 IS NULL OR id = ?2)
             ORDER BY id",
        )?;

        let notes = stmt
            .query_map(params![NoteStatus::Active.as_str(), id], row_to_note)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list notes")?;

        Ok(notes)
    }

    /// Active note by id
    pub fn find_active(&self, id: i64) -> Result<Option<Note>> {
        let conn = self.connect()?;

        conn.query_row(
            "SELECT id, title, content, status FROM notes WHERE id = ?1 AND status = ?2",
            params![id, NoteStatus::Active.as_str()],
            row_to_note,
        )
        .optional()
        .context("Failed to look up note")
    }

    pub fn create(&self, new: NewNote) -> Result<Note> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO notes (title, content, status) VALUES (?1, ?2, ?3)",
            params![new.title, new.content, new.status.as_str()],
        )
        .context("Failed to insert note")?;

        let note = Note {
            id: conn.last_insert_rowid(),
            title: new.title,
            content: new.content,
            status: new.status,
        };
        info!("📝 Created note {}", note.id);
        Ok(note)
    }

    /// Overwrite an active note. Returns false if it is gone or already deleted.
    pub fn update(&self, note: &Note) -> Result<bool> {
        let conn = self.connect()?;

        let rows = conn
            .execute(
                "UPDATE notes SET title = ?1, content = ?2, status = ?3
                 WHERE id = ?4 AND status = ?5",
                params![
                    note.title,
                    note.content,
                    note.status.as_str(),
                    note.id,
                    NoteStatus::Active.as_str(),
                ],
            )
            .context("Failed to update note")?;

        Ok(rows > 0)
    }

    /// Mark an active note deleted. Returns false if there was nothing to delete.
    pub fn soft_delete(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;

        let rows = conn
            .execute(
                "UPDATE notes SET status = ?1 WHERE id = ?2 AND status = ?3",
                params![
                    NoteStatus::Deleted.as_str(),
                    id,
                    NoteStatus::Active.as_str()
                ],
            )
            .context("Failed to delete note")?;

        if rows > 0 {
            info!("🗑️  Soft-deleted note {}", id);
        }
        Ok(rows > 0)
    }
}

fn row_to_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
    let status_str: String = row.get(3)?;
    let status = NoteStatus::from_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown note status '{}'", status_str).into(),
        )
    })?;

    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (NoteStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = NoteStore::new(temp_file.path()).unwrap();
        (store, temp_file)
    }

    fn new_note(title: &str) -> NewNote {
        NewNote {
            title: Some(title.to_string()),
            content: Some("body".to_string()),
            status: NoteStatus::Active,
        }
    }

    #[test]
    fn test_create_and_list() {
        let (store, _temp) = create_test_store();

        let a = store.create(new_note("a")).unwrap();
        let b = store.create(new_note("b")).unwrap();
        assert!(b.id > a.id);

        let notes = store.list_active(None).unwrap();
        assert_eq!(notes, vec![a.clone(), b]);

        let only_a = store.list_active(Some(a.id)).unwrap();
        assert_eq!(only_a, vec![a]);
    }

    #[test]
    fn test_soft_delete_hides_note() {
        let (store, _temp) = create_test_store();
        let note = store.create(new_note("temp")).unwrap();

        assert!(store.soft_delete(note.id).unwrap());
        assert!(store.list_active(None).unwrap().is_empty());
        assert!(store.find_active(note.id).unwrap().is_none());

        // second delete finds nothing
        assert!(!store.soft_delete(note.id).unwrap());
    }

    #[test]
    fn test_soft_delete_keeps_row() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = NoteStore::new(temp_file.path()).unwrap();
        let note = store.create(new_note("kept")).unwrap();
        store.soft_delete(note.id).unwrap();

        let conn = Connection::open(temp_file.path()).unwrap();
        let status: String = conn
            .query_row(
                "SELECT status FROM notes WHERE id = ?1",
                params![note.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(status, "deleted");
    }

    #[test]
    fn test_update_active_only() {
        let (store, _temp) = create_test_store();
        let mut note = store.create(new_note("draft")).unwrap();

        note.title = Some("final".to_string());
        assert!(store.update(&note).unwrap());
        assert_eq!(
            store.find_active(note.id).unwrap().unwrap().title.as_deref(),
            Some("final")
        );

        store.soft_delete(note.id).unwrap();
        note.title = Some("resurrected".to_string());
        assert!(!store.update(&note).unwrap());
    }

    #[test]
    fn test_missing_note() {
        let (store, _temp) = create_test_store();
        assert!(store.find_active(99).unwrap().is_none());
        assert!(store.list_active(Some(99)).unwrap().is_empty());
    }
}
