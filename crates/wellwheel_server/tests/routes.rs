use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use wellwheel_client::memory::{InMemoryScoreStore, TokenAsUser};
use wellwheel_client::youtube::ReqwestYoutubeClient;
use wellwheel_client::{AuthVerifier, ScoreStore};
use wellwheel_server::{AppState, Clock, router};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn base_state() -> AppState {
    AppState::new(Arc::new(InMemoryScoreStore::new()), Arc::new(TokenAsUser))
        .with_clock(Clock::Fixed(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()))
}

async fn call(state: AppState, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router(Arc::new(state)).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", "Bearer tester")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_authed(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", "Bearer tester")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_is_plain_ok() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = call(base_state(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn metrics_without_recorder_is_not_found() {
    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, _) = call(base_state(), req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upstream_quota_error_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("channelId", "UCN2pD4zVw3u3qcsqY1o7JhA"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}
        })))
        .mount(&server)
        .await;

    let yt = ReqwestYoutubeClient::new(
        &server.uri(),
        SecretString::new("k".into()),
        reqwest::Client::new(),
    );
    let state = base_state().with_video(Arc::new(yt));
    let (status, body) = call(state, post_json("/api/edu-search", json!({"query": "eyes"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "The request cannot be completed because you have exceeded your quota."
    );
}

#[tokio::test]
async fn playlist_page_goes_through_the_real_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UUoquIFLN9kHo2HNKb5JSoqA"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nextPageToken": "T2",
            "items": [
                {"snippet": {"title": "Private video", "resourceId": {"videoId": "p"}}},
                {"snippet": {"title": "Morning light walk", "resourceId": {"videoId": "m"},
                    "thumbnails": {"medium": {"url": "https://i/m.jpg"}}}}
            ]
        })))
        .mount(&server)
        .await;

    let yt = ReqwestYoutubeClient::new(
        &server.uri(),
        SecretString::new("k".into()),
        reqwest::Client::new(),
    );
    let state = base_state().with_video(Arc::new(yt));
    let (status, body) = call(state, post_json("/api/youtube-search", json!({"topic": "other"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nextPageToken"], "T2");
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["thumbnail"], "https://i/m.jpg");
    assert_eq!(body["items"][0]["url"], "https://www.youtube.com/watch?v=m");
}

#[tokio::test]
async fn malformed_edu_search_body_is_rejected() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/edu-search")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = call(base_state(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid JSON body"));
}

#[tokio::test]
async fn bare_options_on_uploads_search_is_no_content() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/youtube-search")
        .body(Body::empty())
        .unwrap();
    let resp = router(Arc::new(base_state())).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn questions_resolve_by_anchor() {
    let req = Request::builder()
        .uri("/api/questions/nutrition-diet")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(base_state(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["topic"], "Nutrition & Diet");
    assert!(!body["questions"].as_array().unwrap().is_empty());

    let req = Request::builder()
        .uri("/api/questions/astrology")
        .body(Body::empty())
        .unwrap();
    let (status, _) = call(base_state(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn vision_submission_stores_four_rows() {
    let state = base_state();
    let store = state.store.clone();
    let body = json!({
        "prescription": {"od": {"sph": "0", "cyl": "0"}, "os": {"sph": "0", "cyl": "0"}, "pd": "63"},
        "acuity": {"best_line": "20/20"},
        "osdi": [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]
    });
    let (status, resp) = call(state, post_json("/api/vision", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["scores"]["overall"], 1.0);
    let topics: Vec<&str> = resp["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["topic"].as_str().unwrap())
        .collect();
    assert_eq!(
        topics,
        vec![
            "Vision Wellness",
            "Vision Wellness: Prescription",
            "Vision Wellness: Acuity",
            "Vision Wellness: OSDI"
        ]
    );

    let user = TokenAsUser.verify("tester").await.unwrap();
    let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    assert_eq!(store.scores_for_day(&user, day).await.unwrap().len(), 4);
}

#[tokio::test]
async fn unreadable_prescription_scores_zero() {
    let state = base_state();
    let store = state.store.clone();
    let body = json!({
        "prescription": {"od": {"sph": "abc", "cyl": "?"}, "os": {"sph": "-1..5", "cyl": "n/a"}, "pd": "sixty"}
    });
    let (status, resp) = call(state, post_json("/api/vision", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["scores"]["prescription"], 0.0);

    let user = TokenAsUser.verify("tester").await.unwrap();
    let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    let rows = store.scores_for_day(&user, day).await.unwrap();
    let stored = rows
        .iter()
        .find(|r| r.topic == "Vision Wellness: Prescription")
        .unwrap();
    assert_eq!(stored.score, 0.0);
}

#[tokio::test]
async fn vision_rejects_extra_osdi_answers() {
    let state = base_state();
    let store = state.store.clone();
    let body = json!({"osdi": vec![1; 13]});
    let (status, resp) = call(state, post_json("/api/vision", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("at most 12"));

    let user = TokenAsUser.verify("tester").await.unwrap();
    let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    assert!(store.scores_for_day(&user, day).await.unwrap().is_empty());
}

#[tokio::test]
async fn vision_topic_is_not_a_questionnaire() {
    let (status, body) = call(
        base_state(),
        post_json("/api/scores/Vision%20Wellness", json!({"answers": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("/api/vision"));
}

#[tokio::test]
async fn report_rejects_unknown_grouping() {
    let (status, _) = call(base_state(), get_authed("/api/report?group_by=decade")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(base_state(), get_authed("/api/report?group_by=month")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["group_by"], "month");
}

#[tokio::test]
async fn wheel_svg_is_served_as_svg() {
    let resp = router(Arc::new(base_state()))
        .oneshot(get_authed("/api/wheel.svg?size=300"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/svg+xml");
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).starts_with("<svg"));
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let req = Request::builder().uri("/api/scores").body(Body::empty()).unwrap();
    let (status, body) = call(base_state(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing bearer token");
}
