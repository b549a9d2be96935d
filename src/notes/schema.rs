//! Request body validation for notes.
//!
//! Errors are collected per field, so one response lists every problem.

use crate::notes::models::{NoteChanges, NoteStatus};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const TITLE_MAX_LEN: usize = 1024;

/// Field name -> messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Which request a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Create,
    Update,
}

/// Validate a note body and turn it into a change set
pub fn parse_note_body(body: &Value, kind: BodyKind) -> Result<NoteChanges, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Some(fields) = body.as_object() else {
        errors.insert("_schema".to_string(), vec!["Invalid input type.".to_string()]);
        return Err(errors);
    };

    let mut changes = NoteChanges::default();

    for (key, value) in fields {
        match key.as_str() {
            "id" => {
                if value.is_null() {
                    continue;
                }
                // ids are assigned by the store; updates go through PUT
                if kind == BodyKind::Create {
                    push(&mut errors, key, "Cannot be set when creating a note.");
                } else if parse_id(value).is_none() {
                    push(&mut errors, key, "Not a valid integer.");
                }
            }
            "title" => match nullable_string(value) {
                Ok(title) => {
                    if title.as_ref().is_some_and(|t| t.chars().count() > TITLE_MAX_LEN) {
                        push(
                            &mut errors,
                            key,
                            &format!("Longer than maximum length {}.", TITLE_MAX_LEN),
                        );
                    } else {
                        changes.title = Some(title);
                    }
                }
                Err(msg) => push(&mut errors, key, msg),
            },
            "content" => match nullable_string(value) {
                Ok(content) => changes.content = Some(content),
                Err(msg) => push(&mut errors, key, msg),
            },
            "is_active" => match value {
                Value::Null => {}
                Value::Bool(flag) => changes.status = Some(NoteStatus::from_active_flag(*flag)),
                _ => push(&mut errors, key, "Not a valid boolean."),
            },
            _ => push(&mut errors, key, "Unknown field."),
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

/// Note id from a body field. Accepts integers and integer strings.
pub fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether a body carries a usable (truthy) `id`
pub fn id_supplied(fields: &Map<String, Value>) -> bool {
    match fields.get("id") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn nullable_string(value: &Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err("Not a valid string."),
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}
