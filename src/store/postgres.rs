use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{NewTodo, StoreError, TodoChanges, TodoFilter, TodoStore};
use crate::todos::TodoRow;

const TODO_COLUMNS: &str =
    "id, title, description, due_date, completed, priority, created_at, updated_at";

#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn insert(&self, todo: NewTodo) -> Result<TodoRow, StoreError> {
        let query = format!(
            r#"
            INSERT INTO todos (title, description, due_date, priority)
            VALUES ($1, $2, $3, $4)
            RETURNING {TODO_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.due_date)
            .bind(todo.priority)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list(&self, filter: TodoFilter) -> Result<Vec<TodoRow>, StoreError> {
        // Build the WHERE clause from whichever filter fields are present
        let mut conditions: Vec<String> = Vec::new();

        if filter.completed.is_some() {
            conditions.push(format!("completed = ${}", conditions.len() + 1));
        }
        if filter.priority.is_some() {
            conditions.push(format!("priority = ${}", conditions.len() + 1));
        }

        let mut query = format!("SELECT {TODO_COLUMNS} FROM todos");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query_builder = sqlx::query_as::<_, TodoRow>(&query);

        if let Some(completed) = filter.completed {
            query_builder = query_builder.bind(completed);
        }
        if let Some(priority) = filter.priority {
            query_builder = query_builder.bind(priority);
        }

        Ok(query_builder.fetch_all(&self.pool).await?)
    }

    async fn get(&self, id: i32) -> Result<Option<TodoRow>, StoreError> {
        let query = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1");

        let row = sqlx::query_as::<_, TodoRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, id: i32, changes: TodoChanges) -> Result<Option<TodoRow>, StoreError> {
        // updated_at is always refreshed; every other column only when supplied
        let mut assignments = vec!["updated_at = NOW()".to_string()];

        if changes.title.is_some() {
            assignments.push(format!("title = ${}", assignments.len()));
        }
        if changes.description.is_some() {
            assignments.push(format!("description = ${}", assignments.len()));
        }
        if changes.due_date.is_some() {
            assignments.push(format!("due_date = ${}", assignments.len()));
        }
        if changes.completed.is_some() {
            assignments.push(format!("completed = ${}", assignments.len()));
        }
        if changes.priority.is_some() {
            assignments.push(format!("priority = ${}", assignments.len()));
        }

        let query = format!(
            "UPDATE todos SET {} WHERE id = ${} RETURNING {TODO_COLUMNS}",
            assignments.join(", "),
            assignments.len()
        );

        let mut query_builder = sqlx::query_as::<_, TodoRow>(&query);

        if let Some(title) = changes.title {
            query_builder = query_builder.bind(title);
        }
        if let Some(description) = changes.description {
            query_builder = query_builder.bind(description);
        }
        if let Some(due_date) = changes.due_date {
            query_builder = query_builder.bind(due_date);
        }
        if let Some(completed) = changes.completed {
            query_builder = query_builder.bind(completed);
        }
        if let Some(priority) = changes.priority {
            query_builder = query_builder.bind(priority);
        }

        let row = query_builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
