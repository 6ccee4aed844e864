//! Request body validation for todo writes.
//!
//! `validate_todo_input` is a pure function over the parsed JSON body;
//! `ValidatedTodo` wires it into axum as an extractor so that handlers only
//! ever see input that already passed the schema.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::TodoInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Checks a todo body: `title` is a required non-empty string, `status` an
/// optional boolean. Keys outside the schema are dropped.
pub fn validate_todo_input(value: &Value) -> Result<TodoInput, Vec<FieldError>> {
    let Some(object) = value.as_object() else {
        return Err(vec![FieldError::new(
            "body",
            format!("Expected object, received {}", type_name(value)),
        )]);
    };

    let mut errors = Vec::new();

    let title = match object.get("title") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("title", "Required"));
            None
        }
        Some(Value::String(title)) if title.is_empty() => {
            errors.push(FieldError::new("title", "Title is required"));
            None
        }
        Some(Value::String(title)) => Some(title.clone()),
        Some(other) => {
            errors.push(FieldError::new(
                "title",
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    };

    let status = match object.get("status") {
        None => None,
        Some(Value::Bool(status)) => Some(*status),
        Some(other) => {
            errors.push(FieldError::new(
                "status",
                format!("Expected boolean, received {}", type_name(other)),
            ));
            None
        }
    };

    match title {
        Some(title) if errors.is_empty() => Ok(TodoInput { title, status }),
        _ => Err(errors),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extractor that rejects with 400 before the handler runs.
#[derive(Debug, Clone)]
pub struct ValidatedTodo(pub TodoInput);

impl<S> FromRequest<S> for ValidatedTodo
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::Validation(vec![FieldError::new("body", rejection.body_text())])
            })?;

        // A bodyless request validates like an empty object.
        let value = if bytes.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Validation(vec![FieldError::new(
                    "body",
                    format!("Malformed JSON: {}", e),
                )])
            })?
        };

        validate_todo_input(&value)
            .map(ValidatedTodo)
            .map_err(AppError::Validation)
    }
}
