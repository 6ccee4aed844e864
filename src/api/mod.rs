use axum::Json;
use axum::extract::Path;
use axum::routing::{get, put};
use axum::{Router, extract::State, http::StatusCode};

use crate::auth::AuthUser;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{MessageResponse, Todo};
use crate::state::AppState;
use crate::validation::ValidatedTodo;

/// Todo routes under `/api/todos`. The collection also answers with a
/// trailing slash. Authentication is layered on by the caller.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/api/todos/{id}/status", put(toggle_todo_status))
}

async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = repository::fetch_todos(&state.db, &user.user_id).await?;
    Ok(Json(todos))
}

async fn get_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let todo = repository::find_todo(&state.db, &id, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(todo))
}

async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedTodo(input): ValidatedTodo,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = repository::insert_todo(&state.db, &user.user_id, input).await?;
    tracing::debug!("created todo {} for {}", todo.id, todo.user_id);
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ValidatedTodo(input): ValidatedTodo,
) -> Result<Json<Todo>, AppError> {
    let todo = repository::update_todo(&state.db, &id, &user.user_id, input)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(todo))
}

// Matches on id alone; ownership is not checked here.
async fn toggle_todo_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let todo = repository::toggle_todo_status(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let deleted = repository::delete_todo(&state.db, &id, &user.user_id).await?;
    if deleted {
        Ok(Json(MessageResponse {
            message: "Todo deleted".to_string(),
        }))
    } else {
        Err(AppError::NotFound)
    }
}
