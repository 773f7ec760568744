use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::date;
use super::model::Priority;
use crate::store::{NewTodo, TodoChanges, TodoFilter};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "date::deserialize_optional")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Body of an update. Outer `None` means the key was absent, `Some(None)` an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoPatch {
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "date::deserialize_patch")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub completed: Option<Option<bool>>,
    #[serde(default, deserialize_with = "deserialize_patch")]
    pub priority: Option<Option<Priority>>,
}

#[derive(Debug, Clone)]
pub struct UpdateTodoInput {
    pub id: i32,
    pub patch: TodoPatch,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct FilterTodosInput {
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeleteTodoInput {
    pub id: i32,
}

fn deserialize_patch<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// VALIDATION

pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }

    Ok(())
}

impl CreateTodoInput {
    /// Validates and converts into the row to insert. An empty description is stored as `NULL`.
    pub fn into_new_todo(self) -> Result<NewTodo, String> {
        validate_title(&self.title)?;

        Ok(NewTodo {
            title: self.title,
            description: self.description.filter(|d| !d.is_empty()),
            due_date: self.due_date,
            priority: self.priority,
        })
    }
}

impl TodoPatch {
    pub fn into_changes(self) -> Result<TodoChanges, String> {
        let title = match self.title {
            Some(Some(title)) => {
                validate_title(&title)?;
                Some(title)
            }
            Some(None) => return Err("Title cannot be null".to_string()),
            None => None,
        };

        let completed = match self.completed {
            Some(Some(completed)) => Some(completed),
            Some(None) => return Err("Completed cannot be null".to_string()),
            None => None,
        };

        Ok(TodoChanges {
            title,
            description: self.description,
            due_date: self.due_date,
            completed,
            priority: self.priority,
        })
    }
}

impl From<FilterTodosInput> for TodoFilter {
    fn from(input: FilterTodosInput) -> Self {
        TodoFilter {
            completed: input.completed,
            priority: input.priority,
        }
    }
}
