//! Integration tests for the HTTP surface mounted on a dbxserver::Server

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use dbxcatalog::{DramaboxClient, DramaboxServerExt};
use dbxserver::ServerBuilder;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn app(primary: &MockServer, mirror: &MockServer) -> Router {
    let client = DramaboxClient::builder()
        .api_url(primary.uri())
        .mirror_url(format!("{}/api/dramabox", mirror.uri()))
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let mut server = ServerBuilder::new("Test", "localhost", 0).build();
    server.register_dramabox(Arc::new(client)).await;
    server.router().await
}

async fn forbid_calls(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn search_without_query_is_rejected_before_any_call() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&primary).await;
    forbid_calls(&mirror).await;

    for uri in ["/api/dramabox/search", "/api/dramabox/search?query="] {
        let (status, body) = get(app(&primary, &mirror).await, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Query parameter is required"}));
    }
}

#[tokio::test]
async fn stream_without_book_id_is_rejected_before_any_call() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&primary).await;
    forbid_calls(&mirror).await;

    let (status, body) = get(app(&primary, &mirror).await, "/api/dramabox/stream?episode=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "bookId parameter is required"}));
}

#[tokio::test]
async fn stream_not_found_when_both_fail() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mirror)
        .await;

    let (status, body) = get(app(&primary, &mirror).await, "/api/dramabox/stream?bookId=42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Stream not found"}));
}

#[tokio::test]
async fn trending_page_is_parsed_leniently() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&mirror).await;

    Mock::given(method("POST"))
        .and(path("/drama-box/he001/theater"))
        .and(body_partial_json(json!({"pageNo": 1, "channelId": 43})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"newTheaterList": {"records": [{"bookId": "1", "coverWap": "w.jpg"}]}}
        })))
        .expect(1)
        .mount(&primary)
        .await;

    let (status, body) = get(app(&primary, &mirror).await, "/api/dramabox/trending?page=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"bookId": "1", "coverWap": "w.jpg", "tags": []}]));
}

#[tokio::test]
async fn repeated_page_key_uses_first_value() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&mirror).await;

    Mock::given(method("POST"))
        .and(path("/drama-box/he001/theater"))
        .and(body_partial_json(json!({"pageNo": 1, "channelId": 43})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"newTheaterList": {"records": [{"bookId": "1"}]}}
        })))
        .expect(1)
        .mount(&primary)
        .await;

    let (status, body) = get(app(&primary, &mirror).await, "/api/dramabox/trending?page=1&page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"bookId": "1", "tags": []}]));
}

#[tokio::test]
async fn repeated_search_and_stream_keys_reach_handlers() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/drama-box/search/suggest"))
        .and(body_partial_json(json!({"keyword": "a"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"suggestList": [{"bookId": "5"}]}
        })))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("POST"))
        .and(path("/drama-box/chapterv2/batch/load"))
        .and(body_partial_json(json!({"bookId": "1", "index": 2})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dramabox/stream"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mirror)
        .await;

    let (status, body) = get(app(&primary, &mirror).await, "/api/dramabox/search?query=a&query=b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"bookId": "5", "tags": []}]));

    let (status, body) = get(
        app(&primary, &mirror).await,
        "/api/dramabox/stream?bookId=1&episode=2&episode=3",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Stream not found"}));
}

#[tokio::test]
async fn latest_relays_mirror_array() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(403))
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dramabox/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"bookId": "m1"}])))
        .expect(1)
        .mount(&mirror)
        .await;

    let (status, body) = get(app(&primary, &mirror).await, "/api/dramabox/latest?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"bookId": "m1"}]));
}

#[tokio::test]
async fn root_serves_descriptor() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    let (status, body) = get(app(&primary, &mirror).await, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "name": "DramaBox API",
            "version": "1.0.0",
            "endpoints": {
                "trending": "GET /api/dramabox/trending",
                "latest": "GET /api/dramabox/latest",
                "search": "GET /api/dramabox/search?query=...",
                "stream": "GET /api/dramabox/stream?bookId=...&episode=..."
            }
        })
    );
}

#[tokio::test]
async fn unmatched_routes_are_json_404() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&primary).await;
    forbid_calls(&mirror).await;

    let (status, body) = get(app(&primary, &mirror).await, "/api/dramabox/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));

    let response = app(&primary, &mirror)
        .await
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/dramabox/trending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    let response = app(&primary, &mirror)
        .await
        .oneshot(
            Request::get("/")
                .header("origin", "https://player.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
