//! In-memory todo store (non-persistent).

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{NewTodo, StoreError, TodoChanges, TodoFilter, TodoStore};
use crate::todos::TodoRow;

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, TodoRow>,
}

#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_changes(row: &mut TodoRow, changes: TodoChanges) {
    if let Some(title) = changes.title {
        row.title = title;
    }
    if let Some(description) = changes.description {
        row.description = description;
    }
    if let Some(due_date) = changes.due_date {
        row.due_date = due_date;
    }
    if let Some(completed) = changes.completed {
        row.completed = completed;
    }
    if let Some(priority) = changes.priority {
        row.priority = priority;
    }
    row.updated_at = Utc::now().max(row.updated_at);
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn insert(&self, todo: NewTodo) -> Result<TodoRow, StoreError> {
        let mut table = self.table.write().await;
        // ids are never handed out twice, even after a delete
        table.last_id += 1;

        let now = Utc::now();
        let row = TodoRow {
            id: table.last_id,
            title: todo.title,
            description: todo.description,
            due_date: todo.due_date,
            completed: false,
            priority: todo.priority,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(row.id, row.clone());

        Ok(row)
    }

    async fn list(&self, filter: TodoFilter) -> Result<Vec<TodoRow>, StoreError> {
        let table = self.table.read().await;
        let mut rows: Vec<TodoRow> = table
            .rows
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<TodoRow>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: i32, changes: TodoChanges) -> Result<Option<TodoRow>, StoreError> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        apply_changes(row, changes);

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
