use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, CountryDay, Summary, DEFAULT_ACCESS_TOKEN};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("X-Access-Token", DEFAULT_ACCESS_TOKEN)
        .header("Accept", "application/json")
        .body(String::new())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/summary").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("access token"));
}

#[tokio::test]
async fn wrong_token_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/summary")
                .header("X-Access-Token", "nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- country ---

#[tokio::test]
async fn country_days_filtered_by_range() {
    let resp = app()
        .oneshot(get("/premium/country/CH?from=2020-03-02&to=2020-03-04"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let days: Vec<CountryDay> = body_json(resp).await;
    let dates: Vec<&str> = days.iter().map(|d| &d.date[..10]).collect();
    assert_eq!(dates, ["2020-03-02", "2020-03-03", "2020-03-04"]);
    assert_eq!(days.iter().map(|d| d.new_cases).sum::<i64>(), 87);
}

#[tokio::test]
async fn country_accepts_name_case_insensitively() {
    let resp = app()
        .oneshot(get("/premium/country/france?from=2020-03-01&to=2020-03-31"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let days: Vec<CountryDay> = body_json(resp).await;
    assert_eq!(days.len(), 2);
    assert!(days.iter().all(|d| d.country_iso == "FR"));
}

#[tokio::test]
async fn country_range_without_data_is_empty_list() {
    let resp = app()
        .oneshot(get("/premium/country/CH?from=2019-01-01&to=2019-12-31"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let days: Vec<CountryDay> = body_json(resp).await;
    assert!(days.is_empty());
}

#[tokio::test]
async fn unknown_country_returns_404() {
    let resp = app()
        .oneshot(get("/premium/country/XX?from=2020-03-01&to=2020-03-31"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_range_returns_400() {
    let resp = app().oneshot(get("/premium/country/CH")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- travel ---

#[tokio::test]
async fn travel_returns_nested_level() {
    let resp = app().oneshot(get("/premium/travel/country/FR")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["Level"]["Level"], 3);
    assert_eq!(body["Country"]["Timestamp"], "2021-01-05T11:06:37.000Z");
}

#[tokio::test]
async fn travel_unknown_country_returns_message_only() {
    let resp = app().oneshot(get("/premium/travel/country/XX")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body.get("Level").is_none());
    assert!(body["message"].is_string());
}

// --- summary ---

#[tokio::test]
async fn summary_returns_global_object() {
    let resp = app().oneshot(get("/summary")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Summary = body_json(resp).await;
    assert_eq!(summary.global.total_confirmed, 117_018_562);
    assert_eq!(summary.global.new_deaths, 7_153);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(get("/premium/unknown")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
