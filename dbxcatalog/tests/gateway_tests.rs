//! Integration tests for the primary-then-mirror client

use dbxcatalog::{CatalogPage, DramaboxClient, StreamLookup};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{any, body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const THEATER: &str = "/drama-box/he001/theater";
const SUGGEST: &str = "/drama-box/search/suggest";
const CHAPTERS: &str = "/drama-box/chapterv2/batch/load";

fn client_for(primary: &MockServer, mirror: &MockServer) -> DramaboxClient {
    DramaboxClient::builder()
        .api_url(primary.uri())
        .mirror_url(format!("{}/api/dramabox", mirror.uri()))
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

/// Any request reaching `server` fails the test when it is dropped
async fn forbid_calls(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

fn theater_body() -> Value {
    json!({
        "status": 0,
        "data": {"newTheaterList": {"records": [
            {
                "bookId": "41000101",
                "bookName": "The CEO's Contract Wife",
                "cover": "https://img/cover.jpg",
                "introduction": "A marriage of convenience.",
                "tags": ["Romance", "CEO"],
                "totalChapter": 82,
                "rankVo": {"hotCode": "2.1M", "rankType": 1}
            }
        ]}}
    })
}

#[tokio::test]
async fn trending_uses_primary_when_it_answers() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&mirror).await;

    Mock::given(method("POST"))
        .and(path(THEATER))
        .and(body_partial_json(json!({"isNeedRank": 1, "channelId": 43, "pageNo": 2})))
        .and(header("package-name", "com.storymatrix.drama"))
        .and(header("user-agent", "okhttp/4.10.0"))
        .and(header_exists("tn"))
        .and(header_exists("device-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(theater_body()))
        .expect(1)
        .mount(&primary)
        .await;

    let page = client_for(&primary, &mirror).trending(2).await;

    assert!(!page.is_mirror());
    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        json!([{
            "bookId": "41000101",
            "bookName": "The CEO's Contract Wife",
            "coverWap": "https://img/cover.jpg",
            "introduction": "A marriage of convenience.",
            "tags": ["Romance", "CEO"],
            "chapterCount": 82,
            "rankVo": {"hotCode": "2.1M", "rankType": 1}
        }])
    );
}

#[tokio::test]
async fn latest_falls_back_to_mirror_verbatim() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(THEATER))
        .and(body_partial_json(json!({"isNeedRank": 0, "channelId": 48})))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&primary)
        .await;

    let relayed = json!([
        {"bookId": "9", "bookName": "Mirror Drama", "cover": "m.jpg", "views": 1200}
    ]);
    Mock::given(method("GET"))
        .and(path("/api/dramabox/latest"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(relayed.clone()))
        .expect(1)
        .mount(&mirror)
        .await;

    let page = client_for(&primary, &mirror).latest(1).await;

    assert!(page.is_mirror());
    assert_eq!(serde_json::to_value(&page).unwrap(), relayed);
}

#[tokio::test]
async fn search_shape_mismatch_falls_back() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(SUGGEST))
        .and(body_partial_json(json!({"keyword": "contract wife"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 0, "data": {}})))
        .expect(1)
        .mount(&primary)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/dramabox/search"))
        .and(query_param("query", "contract wife"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"bookId": "3"}])))
        .expect(1)
        .mount(&mirror)
        .await;

    let page = client_for(&primary, &mirror).search("contract wife").await;
    assert_eq!(serde_json::to_value(&page).unwrap(), json!([{"bookId": "3"}]));

    let requests = mirror.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("query=contract%20wife"));
}

#[tokio::test]
async fn mirror_non_array_becomes_empty_list() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dramabox/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "rate limited"})))
        .expect(1)
        .mount(&mirror)
        .await;

    let page = client_for(&primary, &mirror).trending(1).await;
    assert!(page.is_empty());
    assert_eq!(serde_json::to_value(&page).unwrap(), json!([]));
}

#[tokio::test]
async fn both_failing_yields_empty_list() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&primary)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mirror)
        .await;

    let page = client_for(&primary, &mirror).search("anything").await;
    assert_eq!(page, CatalogPage::Mirror(vec![]));
}

#[tokio::test]
async fn empty_primary_records_do_not_fall_back() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&mirror).await;

    Mock::given(method("POST"))
        .and(path(THEATER))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"newTheaterList": {"records": []}}})),
        )
        .mount(&primary)
        .await;

    let page = client_for(&primary, &mirror).trending(40).await;
    assert_eq!(page, CatalogPage::Primary(vec![]));
}

#[tokio::test]
async fn primary_timeout_falls_back() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(THEATER))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(theater_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dramabox/trending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"bookId": "m"}])))
        .expect(1)
        .mount(&mirror)
        .await;

    let client = DramaboxClient::builder()
        .api_url(primary.uri())
        .mirror_url(format!("{}/api/dramabox", mirror.uri()))
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();

    let page = client.trending(1).await;
    assert!(page.is_mirror());
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn stream_selects_requested_episode() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&mirror).await;

    Mock::given(method("POST"))
        .and(path(CHAPTERS))
        .and(body_partial_json(json!({"bookId": "41000101", "index": 2, "comingPlaySectionId": -1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"chapterList": [
                {"chapterIndex": 0, "cover": "c0.jpg", "cdnList": [{"quality": 720, "videoPath": "e1.mp4", "isDefault": 1}]},
                {"chapterIndex": 1, "cover": "c1.jpg", "cdnList": [
                    {"quality": 1080, "videoPath": "e2-1080.mp4", "isDefault": 1},
                    {"quality": 540, "videoPath": "e2-540.mp4"}
                ]}
            ]}
        })))
        .expect(1)
        .mount(&primary)
        .await;

    let lookup = client_for(&primary, &mirror)
        .stream("41000101", 2)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&lookup).unwrap(),
        json!({
            "bookId": "41000101",
            "episode": 2,
            "chapterIndex": 1,
            "videoUrl": "e2-1080.mp4",
            "cover": "c1.jpg",
            "qualities": [
                {"quality": 1080, "videoPath": "e2-1080.mp4", "isDefault": 1},
                {"quality": 540, "videoPath": "e2-540.mp4", "isDefault": 0}
            ],
            "totalEpisodes": 2
        })
    );
}

#[tokio::test]
async fn stream_falls_back_when_no_chapter() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CHAPTERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"chapterList": []}})))
        .mount(&primary)
        .await;

    let relayed = json!({"bookId": "7", "episode": 3, "videoUrl": "https://cdn/m3.mp4"});
    Mock::given(method("GET"))
        .and(path("/api/dramabox/stream"))
        .and(query_param("bookId", "7"))
        .and(query_param("episode", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(relayed.clone()))
        .expect(1)
        .mount(&mirror)
        .await;

    let lookup = client_for(&primary, &mirror).stream("7", 3).await.unwrap();
    assert_eq!(lookup, StreamLookup::Mirror(relayed));
    assert_eq!(lookup.video_url(), Some("https://cdn/m3.mp4"));
}

#[tokio::test]
async fn stream_without_video_url_is_none() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(404))
        .mount(&primary)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dramabox/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"videoUrl": ""})))
        .expect(1)
        .mount(&mirror)
        .await;

    assert!(client_for(&primary, &mirror).stream("7", 1).await.is_none());
}

#[tokio::test]
async fn stream_both_failing_is_none() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&primary)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mirror)
        .await;

    assert!(client_for(&primary, &mirror).stream("7", 1).await.is_none());
}

#[tokio::test]
async fn token_is_reused_across_calls() {
    let primary = MockServer::start().await;
    let mirror = MockServer::start().await;
    forbid_calls(&mirror).await;

    Mock::given(method("POST"))
        .and(path(THEATER))
        .respond_with(ResponseTemplate::new(200).set_body_json(theater_body()))
        .expect(2)
        .mount(&primary)
        .await;

    let client = client_for(&primary, &mirror);
    client.trending(1).await;
    client.latest(1).await;

    let requests = primary.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let tn = |i: usize| requests[i].headers.get("tn").unwrap().to_str().unwrap().to_string();
    let device = |i: usize| requests[i].headers.get("device-id").unwrap().to_str().unwrap().to_string();
    assert_eq!(tn(0), tn(1));
    assert_eq!(device(0), device(1));
    assert!(tn(0).starts_with("Bearer "));
    assert_eq!(tn(0).len(), "Bearer ".len() + 32);
}
