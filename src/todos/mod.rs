pub mod date;
pub mod handlers;
pub mod input;
pub mod model;

pub use handlers::{
    create_todo, delete_todo, filter_todos, get_todo_by_id, get_todos, todo_stats, update_todo,
    DeleteTodoResult,
};
pub use input::{CreateTodoInput, DeleteTodoInput, FilterTodosInput, TodoPatch, UpdateTodoInput};
pub use model::{Priority, Todo, TodoRow, TodoStats};
