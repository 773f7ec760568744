use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::todos::{
    self, CreateTodoInput, DeleteTodoInput, FilterTodosInput, TodoPatch, UpdateTodoInput,
};

// HANDLERS

/// Create a new todo
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload?;

    let todo = todos::create_todo(state.store.as_ref(), input).await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// List every todo, newest first
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let todos = todos::get_todos(state.store.as_ref()).await?;

    Ok(Json(todos))
}

/// List todos matching `?completed=` and/or `?priority=`
pub async fn filter(
    State(state): State<AppState>,
    query: Result<Query<FilterTodosInput>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(input) = query?;

    let todos = todos::filter_todos(state.store.as_ref(), input).await?;

    Ok(Json(todos))
}

/// Summary counts over every todo
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = todos::todo_stats(state.store.as_ref()).await?;

    Ok(Json(stats))
}

/// Get a single todo by ID
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;

    match todos::get_todo_by_id(state.store.as_ref(), id).await? {
        Some(todo) => Ok(Json(todo)),
        None => Err(AppError::NotFound(id)),
    }
}

/// Update the supplied fields of a todo
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let Json(patch) = payload?;

    let todo = todos::update_todo(state.store.as_ref(), UpdateTodoInput { id, patch }).await?;

    Ok(Json(todo))
}

/// Delete a todo; a missing id still answers 200 with `success: false`
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;

    let result = todos::delete_todo(state.store.as_ref(), DeleteTodoInput { id }).await?;

    Ok(Json(result))
}
