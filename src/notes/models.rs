//! Note Models
//! Mission: Define note records, their lifecycle status and wire shapes

use serde::{Deserialize, Serialize};

/// Stored note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: NoteStatus,
}

impl Note {
    pub fn apply(&mut self, changes: NoteChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

/// Lifecycle of a note. Deleting only flips the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    #[default]
    Active,
    Deleted,
}

impl NoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteStatus::Active => "active",
            NoteStatus::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(NoteStatus::Active),
            "deleted" => Some(NoteStatus::Deleted),
            _ => None,
        }
    }

    pub fn from_active_flag(is_active: bool) -> Self {
        if is_active {
            NoteStatus::Active
        } else {
            NoteStatus::Deleted
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, NoteStatus::Active)
    }
}

/// Fields supplied by a create/update body.
///
/// Outer `None` means "not supplied", inner `None` means explicit null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: Option<Option<String>>,
    pub content: Option<Option<String>>,
    pub status: Option<NoteStatus>,
}

impl NoteChanges {
    /// Build a fresh note from the supplied fields
    pub fn into_new_note(self) -> NewNote {
        NewNote {
            title: self.title.flatten(),
            content: self.content.flatten(),
            status: self.status.unwrap_or_default(),
        }
    }
}

/// Note about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: NoteStatus,
}

/// Note as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteResponse {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: bool,
}

impl NoteResponse {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            is_active: note.status.is_active(),
        }
    }
}

/// Query string of `GET /notes`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub id: Option<String>,
}
