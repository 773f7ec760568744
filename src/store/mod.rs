//! Todo storage with pluggable backends.
//!
//! - `postgres`: the `todos` table in PostgreSQL
//! - `memory`: in-memory storage (non-persistent, for local runs and tests)

mod memory;
mod postgres;

pub use memory::InMemoryTodoStore;
pub use postgres::PgTodoStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::todos::{Priority, TodoRow};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Fields supplied on insert. The store assigns `id`, `completed = false` and both timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

/// Per-field overwrite for an update. `None` leaves the column untouched;
/// `Some(None)` sets a nullable column to `NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
    pub priority: Option<Option<Priority>>,
}

/// Conjunction of the present fields; the default matches every row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl TodoFilter {
    pub fn matches(&self, row: &TodoRow) -> bool {
        self.completed.map_or(true, |c| row.completed == c)
            && self.priority.map_or(true, |p| row.priority == Some(p))
    }
}

/// Todo store trait - implemented by all storage backends.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    async fn insert(&self, todo: NewTodo) -> Result<TodoRow, StoreError>;

    /// Rows matching `filter`, newest `created_at` first, ties broken by `id` descending.
    async fn list(&self, filter: TodoFilter) -> Result<Vec<TodoRow>, StoreError>;

    async fn get(&self, id: i32) -> Result<Option<TodoRow>, StoreError>;

    /// Applies `changes` and refreshes `updated_at`, even when `changes` is empty.
    /// Returns `None` when no row has this id.
    async fn update(&self, id: i32, changes: TodoChanges) -> Result<Option<TodoRow>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}
