use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use todo_api::store::InMemoryTodoStore;
use todo_api::todos::{DeleteTodoResult, Priority, Todo, TodoStats};
use todo_api::{app, AppState};
use tower::ServiceExt;

fn test_app() -> Router {
    app(AppState::new(Arc::new(InMemoryTodoStore::new())))
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn create(app: &Router, body: &str) -> Todo {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/todos", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

async fn error_message(resp: axum::response::Response) -> String {
    let body: serde_json::Value = body_json(resp).await;
    body["error"].as_str().unwrap_or_default().to_string()
}

// --- health ---

#[tokio::test]
async fn health_reports_memory_store() {
    let resp = test_app().oneshot(get("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["status"], 200);
    assert_eq!(body["persistent"], false);
}

// --- create ---

#[tokio::test]
async fn create_minimal_todo_returns_201() {
    let app = test_app();
    let todo = create(&app, r#"{"title":"Minimal Todo"}"#).await;

    assert_eq!(todo.title, "Minimal Todo");
    assert!(!todo.completed);
    assert_eq!(todo.description, None);
    assert_eq!(todo.due_date, None);
    assert_eq!(todo.priority, None);
    assert_eq!(todo.created_at, todo.updated_at);
}

#[tokio::test]
async fn create_serializes_due_date_as_utc_midnight() {
    let app = test_app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/todos",
            r#"{"title":"Taxes","due_date":"2025-04-15","priority":"High"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["due_date"], "2025-04-15T00:00:00Z");
    assert_eq!(body["priority"], "High");
}

#[tokio::test]
async fn create_empty_title_returns_400() {
    let resp = test_app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "Title cannot be empty");
}

#[tokio::test]
async fn create_invalid_priority_returns_400() {
    let app = test_app();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/todos",
            r#"{"title":"x","priority":"Urgent"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(resp)
        .await
        .contains("Invalid priority 'Urgent'. Must be one of: Low, Medium, High"));

    // nothing reached the store
    let resp = app.oneshot(get("/api/todos")).await.unwrap();
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

#[tokio::test]
async fn create_malformed_json_returns_400() {
    let resp = test_app()
        .oneshot(json_request("POST", "/api/todos", r#"{"title":"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- list / filter ---

#[tokio::test]
async fn list_empty() {
    let resp = test_app().oneshot(get("/api/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo> = body_json(resp).await;
    assert!(todos.is_empty());
}

#[tokio::test]
async fn filter_without_params_matches_list() {
    let app = test_app();
    create(&app, r#"{"title":"one","priority":"Low"}"#).await;
    create(&app, r#"{"title":"two"}"#).await;
    create(&app, r#"{"title":"three","priority":"High"}"#).await;

    let all: Vec<Todo> = body_json(app.clone().oneshot(get("/api/todos")).await.unwrap()).await;
    let filtered: Vec<Todo> =
        body_json(app.oneshot(get("/api/todos/filter")).await.unwrap()).await;

    assert_eq!(all.len(), 3);
    assert_eq!(filtered, all);
}

#[tokio::test]
async fn filter_by_completed_and_priority() {
    let app = test_app();
    let medium_done = create(&app, r#"{"title":"medium done","priority":"Medium"}"#).await;
    create(&app, r#"{"title":"medium open","priority":"Medium"}"#).await;
    let high_done = create(&app, r#"{"title":"high done","priority":"High"}"#).await;

    for id in [medium_done.id, high_done.id] {
        let resp = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/todos/{}", id),
                r#"{"completed":true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app
        .oneshot(get("/api/todos/filter?completed=true&priority=Medium"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let todos: Vec<Todo> = body_json(resp).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, medium_done.id);
    assert_eq!(todos[0].priority, Some(Priority::Medium));
}

#[tokio::test]
async fn filter_invalid_priority_returns_400() {
    let resp = test_app()
        .oneshot(get("/api/todos/filter?priority=Urgent"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(resp).await.contains("Invalid priority 'Urgent'"));
}

// --- get by id ---

#[tokio::test]
async fn get_by_id_found_and_missing() {
    let app = test_app();
    let todo = create(&app, r#"{"title":"find me"}"#).await;

    let resp = app
        .clone()
        .oneshot(get(&format!("/api/todos/{}", todo.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let found: Todo = body_json(resp).await;
    assert_eq!(found, todo);

    let resp = app.oneshot(get("/api/todos/9999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_by_non_numeric_id_returns_400() {
    let resp = test_app().oneshot(get("/api/todos/abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_null_clears_and_absent_keeps() {
    let app = test_app();
    let todo = create(
        &app,
        r#"{"title":"notes","description":"details","due_date":"2025-01-10"}"#,
    )
    .await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", todo.id),
            r#"{"title":"renamed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let kept: Todo = body_json(resp).await;
    assert_eq!(kept.title, "renamed");
    assert_eq!(kept.description.as_deref(), Some("details"));
    assert_eq!(kept.due_date, todo.due_date);

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", todo.id),
            r#"{"description":null,"due_date":null}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared: Todo = body_json(resp).await;
    assert_eq!(cleared.title, "renamed");
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.due_date, None);
}

#[tokio::test]
async fn update_empty_body_refreshes_updated_at() {
    let app = test_app();
    let todo = create(&app, r#"{"title":"touch"}"#).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let resp = app
        .oneshot(json_request("PUT", &format!("/api/todos/{}", todo.id), "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert!(updated.updated_at > todo.updated_at);
    assert_eq!(updated.created_at, todo.created_at);
}

#[tokio::test]
async fn update_missing_returns_404() {
    let resp = test_app()
        .oneshot(json_request("PUT", "/api/todos/404", r#"{"completed":true}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(resp).await, "Todo with id 404 not found");
}

#[tokio::test]
async fn update_null_title_returns_400() {
    let app = test_app();
    let todo = create(&app, r#"{"title":"keep"}"#).await;

    let resp = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", todo.id),
            r#"{"title":null}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_null_completed_returns_400_and_leaves_todo() {
    let app = test_app();
    let todo = create(&app, r#"{"title":"keep"}"#).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", todo.id),
            r#"{"completed":null}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "Completed cannot be null");

    let resp = app
        .oneshot(get(&format!("/api/todos/{}", todo.id)))
        .await
        .unwrap();
    let unchanged: Todo = body_json(resp).await;
    assert_eq!(unchanged, todo);
}

// --- delete ---

#[tokio::test]
async fn delete_existing_and_missing() {
    let app = test_app();
    let keep = create(&app, r#"{"title":"keep"}"#).await;
    let gone = create(&app, r#"{"title":"gone"}"#).await;

    let resp = app
        .clone()
        .oneshot(json_request("DELETE", &format!("/api/todos/{}", gone.id), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let result: DeleteTodoResult = body_json(resp).await;
    assert!(result.success);

    let resp = app
        .clone()
        .oneshot(json_request("DELETE", &format!("/api/todos/{}", gone.id), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let result: DeleteTodoResult = body_json(resp).await;
    assert!(!result.success);
    assert_eq!(result.message, format!("Todo with ID {} not found", gone.id));

    let todos: Vec<Todo> = body_json(app.oneshot(get("/api/todos")).await.unwrap()).await;
    assert_eq!(todos, vec![keep]);
}

// --- stats ---

#[tokio::test]
async fn stats_counts_todos() {
    let app = test_app();
    create(&app, r#"{"title":"a","priority":"High"}"#).await;
    create(&app, r#"{"title":"b","priority":"Low"}"#).await;

    let resp = app.oneshot(get("/api/todos/stats")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let stats: TodoStats = body_json(resp).await;
    assert_eq!(
        stats,
        TodoStats {
            total: 2,
            completed: 0,
            pending: 2,
            high_priority_open: 1,
        }
    );
}
