use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Todo, TodoInput};

pub async fn fetch_todos(db: &SqlitePool, user_id: &str) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, title, status, user_id, created_at, updated_at
        FROM todos
        WHERE user_id = ?1
        ORDER BY rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Looks a todo up by id and owner. A todo owned by someone else is reported
/// exactly like a missing one.
pub async fn find_todo(
    db: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, title, status, user_id, created_at, updated_at
        FROM todos
        WHERE id = ?1 AND user_id = ?2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_todo(
    db: &SqlitePool,
    user_id: &str,
    input: TodoInput,
) -> Result<Todo, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let status = input.status.unwrap_or(false);

    sqlx::query(
        r#"
        INSERT INTO todos (id, title, status, user_id, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        "#,
    )
    .bind(&id)
    .bind(&input.title)
    .bind(status)
    .bind(user_id)
    .bind(now)
    .execute(db)
    .await?;

    Ok(Todo {
        id,
        title: input.title,
        status,
        user_id: user_id.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Replaces the title, and the status when one is given, of an owned todo.
pub async fn update_todo(
    db: &SqlitePool,
    id: &str,
    user_id: &str,
    input: TodoInput,
) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos
        SET title = ?1,
            status = COALESCE(?2, status),
            updated_at = ?3
        WHERE id = ?4 AND user_id = ?5
        RETURNING id, title, status, user_id, created_at, updated_at
        "#,
    )
    .bind(&input.title)
    .bind(input.status)
    .bind(Utc::now())
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

/// Flips the status of any todo with this id, whoever owns it.
pub async fn toggle_todo_status(db: &SqlitePool, id: &str) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        UPDATE todos
        SET status = NOT status,
            updated_at = ?1
        WHERE id = ?2
        RETURNING id, title, status, user_id, created_at, updated_at
        "#,
    )
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete_todo(db: &SqlitePool, id: &str, user_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?1 AND user_id = ?2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
