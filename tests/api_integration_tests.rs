//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use nscache::{api::create_router, AppState, CacheService, LocalMap};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let service = CacheService::new(Arc::new(LocalMap::new("memcache", 0)), None).unwrap();
    create_router(AppState::new(service))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn text(value: &str) -> Value {
    json!({"type": "text", "value": value})
}

fn int(value: i64) -> Value {
    json!({"type": "integer", "value": value})
}

// == Single Key Endpoints ==

#[tokio::test]
async fn test_put_then_get_roundtrip() {
    let app = create_test_app();

    let (status, json) = send(&app, "PUT", "/cache/greeting", Some(json!({"value": text("hi")}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], true);

    let (status, json) = send(&app, "GET", "/cache/greeting", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "greeting");
    assert_eq!(json["value"], text("hi"));
}

#[tokio::test]
async fn test_namespaces_isolated_over_http() {
    let app = create_test_app();

    send(&app, "PUT", "/cache/k?namespace=tenant-a", Some(json!({"value": int(1)}))).await;

    let (status, _) = send(&app, "GET", "/cache/k?namespace=tenant-b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/cache/k", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(&app, "GET", "/cache/k?namespace=tenant-a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], int(1));
}

#[tokio::test]
async fn test_invalid_namespace_is_bad_request() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/cache/k?namespace=a%2Fb", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Namespace"));
}

#[tokio::test]
async fn test_put_policies_over_http() {
    let app = create_test_app();

    let replace = json!({"value": int(1), "policy": "REPLACE_ONLY_IF_PRESENT"});
    let (_, json) = send(&app, "PUT", "/cache/p", Some(replace.clone())).await;
    assert_eq!(json["stored"], false);

    let add = json!({"value": int(2), "policy": "ADD_ONLY_IF_NOT_PRESENT"});
    let (_, json) = send(&app, "PUT", "/cache/p", Some(add.clone())).await;
    assert_eq!(json["stored"], true);
    let (_, json) = send(&app, "PUT", "/cache/p", Some(add)).await;
    assert_eq!(json["stored"], false);

    let (_, json) = send(&app, "PUT", "/cache/p", Some(replace)).await;
    assert_eq!(json["stored"], true);

    let (_, json) = send(&app, "GET", "/cache/p", None).await;
    assert_eq!(json["value"], int(1));
}

#[tokio::test]
async fn test_unsupported_policy_is_bad_request() {
    let app = create_test_app();

    let body = json!({"value": int(1), "policy": "SET_SOMETIMES"});
    let (status, json) = send(&app, "PUT", "/cache/p", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("SET_SOMETIMES"));

    let (_, json) = send(&app, "GET", "/cache/p/contains", None).await;
    assert_eq!(json["present"], false);
}

#[tokio::test]
async fn test_expiry_over_http() {
    let app = create_test_app();

    let body = json!({"value": text("brief"), "expires_in_ms": 100});
    send(&app, "PUT", "/cache/brief", Some(body)).await;

    let (status, _) = send(&app, "GET", "/cache/brief", None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(150)).await;

    let (status, _) = send(&app, "GET", "/cache/brief", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_max_expires_in_ms_is_stored() {
    let app = create_test_app();

    let body = json!({"value": int(1), "expires_in_ms": i64::MAX});
    let (status, json) = send(&app, "PUT", "/cache/far", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], true);

    let (status, json) = send(&app, "GET", "/cache/far", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], int(1));
}

#[tokio::test]
async fn test_delete_endpoint() {
    let app = create_test_app();
    send(&app, "PUT", "/cache/gone", Some(json!({"value": int(1)}))).await;

    let (status, json) = send(&app, "DELETE", "/cache/gone", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deleted"], true);

    let (_, json) = send(&app, "DELETE", "/cache/gone", None).await;
    assert_eq!(json["deleted"], false);
}

#[tokio::test]
async fn test_increment_endpoint() {
    let app = create_test_app();

    let (_, json) = send(&app, "POST", "/cache/counter/increment", Some(json!({"delta": 5}))).await;
    assert_eq!(json["value"], Value::Null);

    let body = json!({"delta": 5, "initial_value": 10});
    let (_, json) = send(&app, "POST", "/cache/counter/increment", Some(body.clone())).await;
    assert_eq!(json["value"], 10);
    let (_, json) = send(&app, "POST", "/cache/counter/increment", Some(body)).await;
    assert_eq!(json["value"], 15);
}

#[tokio::test]
async fn test_increment_non_integer_is_bad_request() {
    let app = create_test_app();
    send(&app, "PUT", "/cache/word", Some(json!({"value": text("ten")}))).await;

    let (status, json) = send(&app, "POST", "/cache/word/increment", Some(json!({"delta": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid value"));
}

#[tokio::test]
async fn test_identifiable_cas_flow() {
    let app = create_test_app();
    send(&app, "PUT", "/cache/doc", Some(json!({"value": text("v1")}))).await;

    let (_, snapshot) = send(&app, "GET", "/cache/doc/identifiable", None).await;
    assert_eq!(snapshot["value"], text("v1"));

    // Someone else writes in between
    send(&app, "PUT", "/cache/doc", Some(json!({"value": text("v2")}))).await;

    let cas = json!({"expected": snapshot["value"], "value": text("v3")});
    let (_, json) = send(&app, "POST", "/cache/doc/cas", Some(cas)).await;
    assert_eq!(json["stored"], false);

    let (_, fresh) = send(&app, "GET", "/cache/doc/identifiable", None).await;
    let cas = json!({"expected": fresh["value"], "value": text("v3")});
    let (_, json) = send(&app, "POST", "/cache/doc/cas", Some(cas)).await;
    assert_eq!(json["stored"], true);

    let (_, json) = send(&app, "GET", "/cache/doc", None).await;
    assert_eq!(json["value"], text("v3"));
}

// == Batch Endpoints ==

#[tokio::test]
async fn test_batch_put_get_delete() {
    let app = create_test_app();

    let body = json!({"entries": {"a": int(1), "b": int(2)}});
    let (_, json) = send(&app, "POST", "/batch/put?namespace=bulk", Some(body)).await;
    assert_eq!(json["keys"], json!(["a", "b"]));

    let body = json!({"keys": ["a", "b", "c"]});
    let (_, json) = send(&app, "POST", "/batch/get?namespace=bulk", Some(body.clone())).await;
    assert_eq!(json["values"]["a"], int(1));
    assert_eq!(json["values"]["b"], int(2));
    assert!(json["values"].get("c").is_none());

    let (_, json) = send(&app, "POST", "/batch/delete?namespace=bulk", Some(body)).await;
    assert_eq!(json["keys"], json!(["a", "b"]));
}

#[tokio::test]
async fn test_batch_put_add_only() {
    let app = create_test_app();
    send(&app, "PUT", "/cache/a", Some(json!({"value": int(0)}))).await;

    let body = json!({"entries": {"a": int(1), "b": int(1)}, "policy": "ADD_ONLY_IF_NOT_PRESENT"});
    let (_, json) = send(&app, "POST", "/batch/put", Some(body)).await;
    assert_eq!(json["keys"], json!(["b"]));
}

#[tokio::test]
async fn test_batch_increment() {
    let app = create_test_app();
    send(&app, "PUT", "/cache/x", Some(json!({"value": int(1)}))).await;

    let body = json!({"offsets": {"x": 4, "y": 4}});
    let (_, json) = send(&app, "POST", "/batch/increment", Some(body)).await;
    assert_eq!(json["values"]["x"], 5);
    assert_eq!(json["values"]["y"], Value::Null);
}

#[tokio::test]
async fn test_batch_identifiables_and_cas() {
    let app = create_test_app();
    send(&app, "PUT", "/cache/a", Some(json!({"value": int(1)}))).await;
    send(&app, "PUT", "/cache/b", Some(json!({"value": int(1)}))).await;

    let (_, snapshots) = send(
        &app,
        "POST",
        "/batch/identifiables",
        Some(json!({"keys": ["a", "b", "c"]})),
    )
    .await;
    assert_eq!(snapshots["values"]["c"], Value::Null);

    send(&app, "PUT", "/cache/b", Some(json!({"value": int(42)}))).await;

    let entries: serde_json::Map<String, Value> = ["a", "b", "c"]
        .iter()
        .map(|k| {
            (
                k.to_string(),
                json!({"expected": snapshots["values"][k], "value": int(7)}),
            )
        })
        .collect();
    let (_, json) = send(&app, "POST", "/batch/cas", Some(json!({"entries": entries}))).await;
    assert_eq!(json["keys"], json!(["a", "c"]));

    let (_, json) = send(&app, "GET", "/cache/b", None).await;
    assert_eq!(json["value"], int(42));
}

// == Backing Store Endpoints ==

#[tokio::test]
async fn test_clear_spans_namespaces() {
    let app = create_test_app();
    send(&app, "PUT", "/cache/k?namespace=one", Some(json!({"value": int(1)}))).await;
    send(&app, "PUT", "/cache/k?namespace=two", Some(json!({"value": int(2)}))).await;

    let (status, json) = send(&app, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("memcache"));

    for ns in ["one", "two"] {
        let (status, _) = send(&app, "GET", &format!("/cache/k?namespace={}", ns), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_stats_endpoint_accuracy() {
    let app = create_test_app();

    send(&app, "PUT", "/cache/s", Some(json!({"value": text("abc")}))).await;
    send(&app, "GET", "/cache/s", None).await;
    send(&app, "GET", "/cache/s", None).await;
    send(&app, "GET", "/cache/missing", None).await;

    let response = app
        .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 2);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["item_count"], 1);
    assert_eq!(json["bytes_returned_for_hits"], 6);
    let hit_rate = json["hit_rate"].as_f64().unwrap();
    assert!((hit_rate - 2.0 / 3.0).abs() < 0.001);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache/bad")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_stopped_cache_is_unavailable() {
    let map = Arc::new(LocalMap::new("memcache", 0));
    let service = CacheService::new(map.clone(), None).unwrap();
    let app = create_router(AppState::new(service));

    map.stop();

    let (status, json) = send(&app, "GET", "/cache/k", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("unavailable"));

    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
