//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use studyhive_cache::{api::create_router, cache::KvStore, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(KvStore::new(1024)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn put_entry(app: &Router, key: &str, value: &str, source: &str) -> Value {
    let body = serde_json::json!({ "value": value, "source": source }).to_string();
    let response = send(app, "PUT", &format!("/entries/{}", key), Some(&body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_to_json(response.into_body()).await
}

// == Entry Endpoint Tests ==

#[tokio::test]
async fn test_put_endpoint_success() {
    let app = create_test_app();

    let json = put_entry(&app, "test_key", "test_value", "rules").await;

    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert_eq!(json["evicted"], 0);
}

#[tokio::test]
async fn test_put_endpoint_missing_value() {
    let app = create_test_app();

    let response = send(&app, "PUT", "/entries/k", Some(r#"{"source":"rules"}"#)).await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();
    put_entry(&app, "get_key", "get_value", "device-llm").await;

    let response = send(&app, "GET", "/entries/get_key", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
    assert_eq!(json["source"], "device-llm");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = send(&app, "GET", "/entries/nonexistent", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent"));
}

#[tokio::test]
async fn test_delete_endpoint() {
    let app = create_test_app();
    put_entry(&app, "del_key", "v", "rules").await;

    let response = send(&app, "DELETE", "/entries/del_key", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "DELETE", "/entries/del_key", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_exists_endpoint_leaves_stats_untouched() {
    let app = create_test_app();
    put_entry(&app, "here", "v", "rules").await;

    let response = send(&app, "GET", "/entries/here/exists", None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["exists"], true);

    let response = send(&app, "GET", "/entries/gone/exists", None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["exists"], false);

    let stats = body_to_json(send(&app, "GET", "/stats", None).await.into_body()).await;
    assert_eq!(stats["hits"], 0);
    assert_eq!(stats["misses"], 0);
}

#[tokio::test]
async fn test_clear_endpoint() {
    let app = create_test_app();
    put_entry(&app, "a", "1", "rules").await;
    put_entry(&app, "b", "2", "device-llm").await;

    let response = send(&app, "DELETE", "/entries", None).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 2);

    let stats = body_to_json(send(&app, "GET", "/stats", None).await.into_body()).await;
    assert_eq!(stats["total_entries"], 0);
    assert_eq!(stats["total_size_bytes"], 0);
}

// == Eviction Tests ==

#[tokio::test]
async fn test_lru_eviction_through_api() {
    let app = create_router(AppState::new(KvStore::new(10)));
    put_entry(&app, "a", "123456", "rules").await;

    let json = put_entry(&app, "b", "123456", "rules").await;
    assert_eq!(json["evicted"], 1);

    assert_eq!(
        send(&app, "GET", "/entries/a", None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&app, "GET", "/entries/b", None).await.status(),
        StatusCode::OK
    );

    let stats = body_to_json(send(&app, "GET", "/stats", None).await.into_body()).await;
    assert_eq!(stats["evictions"], 1);
    assert_eq!(stats["total_size_bytes"], 6);
}

// == Source Endpoint Tests ==

#[tokio::test]
async fn test_source_endpoints() {
    let app = create_test_app();
    put_entry(&app, "q1", "aaa", "rules").await;
    put_entry(&app, "q2", "bb", "rules").await;
    put_entry(&app, "g1", "c", "device-llm").await;

    let json = body_to_json(send(&app, "GET", "/sources/rules", None).await.into_body()).await;
    assert_eq!(json["keys"], serde_json::json!(["q2", "q1"]));
    assert_eq!(json["size_bytes"], 5);

    let json = body_to_json(send(&app, "DELETE", "/sources/rules", None).await.into_body()).await;
    assert_eq!(json["removed"], 2);

    let stats = body_to_json(send(&app, "GET", "/stats", None).await.into_body()).await;
    assert_eq!(stats["total_entries"], 1);
    assert_eq!(stats["evictions"], 0);
    assert!(stats["sources"].get("rules").is_none());
    assert_eq!(stats["sources"]["device-llm"]["entries"], 1);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_hit_rate_and_reset() {
    let app = create_test_app();
    put_entry(&app, "k", "v", "rules").await;
    send(&app, "GET", "/entries/k", None).await;
    send(&app, "GET", "/entries/k", None).await;
    send(&app, "GET", "/entries/missing", None).await;

    let stats = body_to_json(send(&app, "GET", "/stats", None).await.into_body()).await;
    assert_eq!(stats["hits"], 2);
    assert_eq!(stats["misses"], 1);
    let hit_rate = stats["hit_rate"].as_f64().unwrap();
    assert!((hit_rate - 2.0 / 3.0).abs() < 1e-9);

    let reset = body_to_json(send(&app, "POST", "/stats/reset", None).await.into_body()).await;
    assert_eq!(reset["hits"], 0);
    assert_eq!(reset["hit_rate"], 0.0);
    assert_eq!(reset["total_entries"], 1);
}

// == Capacity Endpoint Tests ==

#[tokio::test]
async fn test_capacity_endpoints() {
    let app = create_test_app();
    put_entry(&app, "old", "1234", "rules").await;
    put_entry(&app, "new", "1234", "rules").await;

    let json = body_to_json(send(&app, "GET", "/capacity", None).await.into_body()).await;
    assert_eq!(json["max_size_bytes"], 1024);
    assert_eq!(json["size_bytes"], 8);

    let response = send(&app, "PUT", "/capacity", Some(r#"{"max_size_bytes":4}"#)).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["evicted"], 1);
    assert_eq!(json["entries"], 1);

    assert_eq!(
        send(&app, "GET", "/entries/new", None).await.status(),
        StatusCode::OK
    );
}

// == Maintenance Endpoint Tests ==

#[tokio::test]
async fn test_maintenance_endpoints() {
    let app = create_test_app();
    for key in ["a", "b", "c", "d"] {
        put_entry(&app, key, "v", "rules").await;
    }

    let response = send(&app, "POST", "/maintenance/expire", Some("{}")).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 0);

    let response = send(&app, "POST", "/maintenance/trim", Some(r#"{"max_entries":2}"#)).await;
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 2);

    assert_eq!(
        send(&app, "GET", "/entries/a", None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&app, "GET", "/entries/d", None).await.status(),
        StatusCode::OK
    );
}

// == Snapshot Endpoint Tests ==

#[tokio::test]
async fn test_snapshot_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("studyhive_cache.json");
    let app = create_router(AppState::new(KvStore::new(1024)).with_snapshot_path(&path));
    put_entry(&app, "quiz", "payload", "rules").await;

    let response = send(&app, "POST", "/snapshot/save", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(path.exists());

    send(&app, "DELETE", "/entries", None).await;

    let response = send(&app, "POST", "/snapshot/load", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["entries"], 1);

    let json = body_to_json(send(&app, "GET", "/entries/quiz", None).await.into_body()).await;
    assert_eq!(json["value"], "payload");
}

#[tokio::test]
async fn test_snapshot_load_corrupt_keeps_cache() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("studyhive_cache.json");
    std::fs::write(&path, "not json at all").unwrap();
    let app = create_router(AppState::new(KvStore::new(1024)).with_snapshot_path(&path));
    put_entry(&app, "keep", "me", "rules").await;

    let response = send(&app, "POST", "/snapshot/load", None).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(
        send(&app, "GET", "/entries/keep", None).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_snapshot_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let app = create_router(
        AppState::new(KvStore::new(1024)).with_snapshot_path(dir.path().join("absent.json")),
    );

    let response = send(&app, "POST", "/snapshot/load", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Quiz and Grade Endpoint Tests ==

#[tokio::test]
async fn test_quiz_roundtrip() {
    let app = create_test_app();
    let body = r#"{"topic":"mitosis","difficulty":"hard","question_count":5,"seed":42,"engine":"device-llm","quiz":"{\"questions\":[]}"}"#;

    let response = send(&app, "PUT", "/quiz", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = body_to_json(response.into_body()).await;
    assert_eq!(stored["key"].as_str().unwrap().len(), 64);

    let uri = "/quiz?topic=mitosis&difficulty=hard&question_count=5&seed=42&engine=device-llm";
    let response = send(&app, "GET", uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], r#"{"questions":[]}"#);
    assert_eq!(json["source"], "device-llm");
    assert_eq!(json["key"], stored["key"]);

    let uri = "/quiz?topic=mitosis&difficulty=hard&question_count=5&seed=43&engine=device-llm";
    assert_eq!(
        send(&app, "GET", uri, None).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_grade_roundtrip() {
    let app = create_test_app();
    let body = r#"{"question_id":"q9","student_answer":"ATP","engine":"rules","grade":"{\"score\":1}"}"#;

    let response = send(&app, "PUT", "/grade", Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        "GET",
        "/grade?question_id=q9&student_answer=ATP&engine=rules",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], r#"{"score":1}"#);

    let json = body_to_json(send(&app, "GET", "/sources/rules", None).await.into_body()).await;
    assert_eq!(json["keys"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_grade_rejects_empty_engine() {
    let app = create_test_app();
    let body = r#"{"question_id":"q9","student_answer":"ATP","engine":"","grade":"{}"}"#;

    let response = send(&app, "PUT", "/grade", Some(body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = send(&app, "GET", "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
