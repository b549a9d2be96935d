//! Notes API Endpoints
//! Mission: List, create, update and soft-delete notes on a single resource path

use crate::api::DetailResponse;
use crate::notes::{
    models::{ListQuery, NoteResponse},
    schema::{id_supplied, parse_id, parse_note_body, BodyKind, FieldErrors},
    store::NoteStore,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub type Result<T> = std::result::Result<T, NotesError>;

/// Shared notes state
#[derive(Clone)]
pub struct NotesState {
    pub store: Arc<NoteStore>,
}

impl NotesState {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self { store }
    }
}

/// Routes of the notes service
pub fn router(state: NotesState) -> Router {
    Router::new()
        .route(
            "/notes",
            get(list_notes)
                .post(create_note)
                .put(update_note)
                .delete(delete_note),
        )
        .with_state(state)
}

/// List notes - GET /notes[?id=]
pub async fn list_notes(
    State(state): State<NotesState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<NoteResponse>>> {
    let filter = match query.id.as_deref() {
        None | Some("") => None,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(id) => Some(id),
            // no note can carry a non-numeric id
            Err(_) => return Ok(Json(Vec::new())),
        },
    };

    let notes = run_blocking(move || state.store.list_active(filter)).await?;
    Ok(Json(notes.iter().map(NoteResponse::from_note).collect()))
}

/// Create note - POST /notes
pub async fn create_note(
    State(state): State<NotesState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    let changes = parse_note_body(&body, BodyKind::Create).map_err(NotesError::Invalid)?;

    let note = run_blocking(move || state.store.create(changes.into_new_note())).await?;
    Ok((StatusCode::CREATED, Json(NoteResponse::from_note(&note))))
}

/// Update note - PUT /notes
///
/// Answers 201 on success, as existing clients expect.
pub async fn update_note(
    State(state): State<NotesState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    let id = require_id(&body)?;

    let store = state.store.clone();
    let mut note = run_blocking(move || store.find_active(id))
        .await?
        .ok_or(NotesError::NotFound)?;

    let changes = parse_note_body(&body, BodyKind::Update).map_err(NotesError::Invalid)?;
    note.apply(changes);

    let saved = note.clone();
    let updated = run_blocking(move || state.store.update(&saved)).await?;
    if !updated {
        // deleted between lookup and write
        return Err(NotesError::NotFound);
    }

    info!("✏️  Updated note {}", note.id);
    Ok((StatusCode::CREATED, Json(NoteResponse::from_note(&note))))
}

/// Soft-delete note - DELETE /notes
pub async fn delete_note(
    State(state): State<NotesState>,
    Json(body): Json<Value>,
) -> Result<Json<DetailResponse>> {
    let id = require_id(&body)?;

    let deleted = run_blocking(move || state.store.soft_delete(id)).await?;
    if !deleted {
        return Err(NotesError::NotFound);
    }

    Ok(Json(DetailResponse::new("Note deleted (soft delete)")))
}

/// The id named by a PUT/DELETE body.
fn require_id(body: &Value) -> Result<i64> {
    let fields = body.as_object().ok_or(NotesError::MissingId)?;
    if !id_supplied(fields) {
        return Err(NotesError::MissingId);
    }

    // a present but unusable id cannot match any note
    fields
        .get("id")
        .and_then(parse_id)
        .ok_or(NotesError::NotFound)
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| anyhow::Error::new(e).context("Notes task panicked"))?;
    Ok(result?)
}

/// Notes API errors
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("ID is required")]
    MissingId,

    #[error("Note not found")]
    NotFound,

    #[error("Invalid note")]
    Invalid(FieldErrors),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for NotesError {
    fn into_response(self) -> Response {
        match self {
            NotesError::Invalid(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            NotesError::Internal(e) => {
                error!("Notes internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(DetailResponse::new("Internal server error")),
                )
                    .into_response()
            }
            other => (
                StatusCode::BAD_REQUEST,
                Json(DetailResponse::new(other.to_string())),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_id() {
        assert_eq!(require_id(&json!({"id": 7})).unwrap(), 7);
        assert_eq!(require_id(&json!({"id": "7"})).unwrap(), 7);
        assert!(matches!(require_id(&json!({})), Err(NotesError::MissingId)));
        assert!(matches!(
            require_id(&json!({"id": 0})),
            Err(NotesError::MissingId)
        ));
        assert!(matches!(
            require_id(&json!({"id": "seven"})),
            Err(NotesError::NotFound)
        ));
        assert!(matches!(require_id(&json!("7")), Err(NotesError::MissingId)));
    }

    #[test]
    fn test_notes_error_responses() {
        assert_eq!(
            NotesError::MissingId.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NotesError::NotFound.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NotesError::Invalid(FieldErrors::new()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NotesError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
