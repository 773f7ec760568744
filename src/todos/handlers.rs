//! The todo operations: validate input, make one store call, normalize the result.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::input::{CreateTodoInput, DeleteTodoInput, FilterTodosInput, UpdateTodoInput};
use super::model::{Todo, TodoStats};
use crate::error::AppError;
use crate::store::{TodoFilter, TodoStore};

/// Outcome of a delete. A missing id is reported here, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoResult {
    pub success: bool,
    pub message: String,
}

impl DeleteTodoResult {
    pub fn deleted(id: i32) -> Self {
        Self {
            success: true,
            message: format!("Todo with ID {} deleted successfully", id),
        }
    }

    pub fn not_found(id: i32) -> Self {
        Self {
            success: false,
            message: format!("Todo with ID {} not found", id),
        }
    }
}

pub async fn create_todo(store: &dyn TodoStore, input: CreateTodoInput) -> Result<Todo, AppError> {
    let new = input.into_new_todo().map_err(AppError::Validation)?;

    let row = store.insert(new).await?;
    info!(id = row.id, "created todo");

    Ok(row.into())
}

pub async fn get_todos(store: &dyn TodoStore) -> Result<Vec<Todo>, AppError> {
    list(store, TodoFilter::default()).await
}

/// `Ok(None)` when no todo has this id.
pub async fn get_todo_by_id(store: &dyn TodoStore, id: i32) -> Result<Option<Todo>, AppError> {
    Ok(store.get(id).await?.map(Todo::from))
}

pub async fn filter_todos(
    store: &dyn TodoStore,
    input: FilterTodosInput,
) -> Result<Vec<Todo>, AppError> {
    list(store, input.into()).await
}

/// Fails with [`AppError::NotFound`] when the id does not exist.
pub async fn update_todo(store: &dyn TodoStore, input: UpdateTodoInput) -> Result<Todo, AppError> {
    let changes = input.patch.into_changes().map_err(AppError::Validation)?;

    if store.get(input.id).await?.is_none() {
        return Err(AppError::NotFound(input.id));
    }

    // A concurrent delete between the lookup and the write also lands here
    let row = store
        .update(input.id, changes)
        .await?
        .ok_or(AppError::NotFound(input.id))?;
    info!(id = row.id, "updated todo");

    Ok(row.into())
}

pub async fn delete_todo(
    store: &dyn TodoStore,
    input: DeleteTodoInput,
) -> Result<DeleteTodoResult, AppError> {
    if store.delete(input.id).await? {
        info!(id = input.id, "deleted todo");
        Ok(DeleteTodoResult::deleted(input.id))
    } else {
        debug!(id = input.id, "delete of missing todo");
        Ok(DeleteTodoResult::not_found(input.id))
    }
}

pub async fn todo_stats(store: &dyn TodoStore) -> Result<TodoStats, AppError> {
    let todos = get_todos(store).await?;
    Ok(TodoStats::from_todos(&todos))
}

async fn list(store: &dyn TodoStore, filter: TodoFilter) -> Result<Vec<Todo>, AppError> {
    let rows = store.list(filter).await?;
    Ok(rows.into_iter().map(Todo::from).collect())
}
