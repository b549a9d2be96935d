//! Notes Module
//! Mission: Note-taking CRUD with soft deletes

pub mod api;
pub mod models;
pub mod schema;
pub mod store;

pub use api::{router, NotesError, NotesState};
pub use models::{Note, NoteStatus};
pub use store::NoteStore;
