use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

pub const DEFAULT_ACCESS_TOKEN: &str = "mock-token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CountryDay {
    pub country: String,
    #[serde(rename = "CountryISO")]
    pub country_iso: String,
    pub date: String,
    pub new_cases: i64,
    pub new_deaths: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelInfo {
    pub country: TravelCountry,
    pub level: TravelLevel,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelCountry {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelLevel {
    pub level: u32,
    pub level_desc: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Summary {
    pub global: GlobalSummary,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSummary {
    pub new_confirmed: i64,
    pub total_confirmed: i64,
    pub new_deaths: i64,
    pub total_deaths: i64,
    pub date: String,
}

#[derive(Deserialize)]
pub struct Range {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Data served by the mock, plus the token every request must present.
#[derive(Debug)]
pub struct Fixtures {
    pub access_token: String,
    pub days: Vec<CountryDay>,
    pub travel: Vec<TravelInfo>,
    pub summary: Summary,
}

pub type Db = Arc<Fixtures>;

fn day(country: &str, iso: &str, date: &str, new_cases: i64, new_deaths: i64) -> CountryDay {
    CountryDay {
        country: country.to_string(),
        country_iso: iso.to_string(),
        date: format!("{date}T00:00:00Z"),
        new_cases,
        new_deaths,
    }
}

impl Fixtures {
    /// Small, fixed dataset for Switzerland and France.
    pub fn sample(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            days: vec![
                day("Switzerland", "CH", "2020-03-01", 3, 0),
                day("Switzerland", "CH", "2020-03-02", 15, 1),
                day("Switzerland", "CH", "2020-03-03", 32, 2),
                day("Switzerland", "CH", "2020-03-04", 40, 0),
                day("Switzerland", "CH", "2020-03-05", -2, 1),
                day("France", "FR", "2020-03-01", 30, 2),
                day("France", "FR", "2020-03-02", 61, 1),
            ],
            travel: vec![TravelInfo {
                country: TravelCountry {
                    id: "FR".to_string(),
                    name: "France".to_string(),
                    timestamp: "2021-01-05T11:06:37.000Z".to_string(),
                },
                level: TravelLevel {
                    level: 3,
                    level_desc: "Level 3: Ban arrivals from some regions".to_string(),
                },
            }],
            summary: Summary {
                global: GlobalSummary {
                    new_confirmed: 376_423,
                    total_confirmed: 117_018_562,
                    new_deaths: 7_153,
                    total_deaths: 2_597_592,
                    date: "2021-03-08T10:48:52.588Z".to_string(),
                },
            },
        }
    }

    fn matches_country(name: &str, iso: &str, wanted: &str) -> bool {
        name.eq_ignore_ascii_case(wanted) || iso.eq_ignore_ascii_case(wanted)
    }
}

pub fn app() -> Router {
    app_with(Fixtures::sample(DEFAULT_ACCESS_TOKEN))
}

pub fn app_with(fixtures: Fixtures) -> Router {
    let db: Db = Arc::new(fixtures);
    Router::new()
        .route("/premium/country/{country}", get(country_days))
        .route("/premium/travel/country/{country}", get(travel))
        .route("/summary", get(summary))
        .route_layer(middleware::from_fn_with_state(db.clone(), require_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, fixtures: Fixtures) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(fixtures)).await
}

async fn require_token(State(db): State<Db>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get("x-access-token")
        .and_then(|value| value.to_str().ok());
    if presented != Some(db.access_token.as_str()) {
        tracing::warn!(uri = %request.uri(), "rejecting request without a valid access token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "You need a valid access token" })),
        )
            .into_response();
    }
    next.run(request).await
}

async fn country_days(
    State(db): State<Db>,
    Path(country): Path<String>,
    Query(range): Query<Range>,
) -> Result<Json<Vec<CountryDay>>, (StatusCode, Json<serde_json::Value>)> {
    let known = db
        .days
        .iter()
        .any(|d| Fixtures::matches_country(&d.country, &d.country_iso, &country));
    if !known {
        return Err((StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))));
    }

    let days = db
        .days
        .iter()
        .filter(|d| Fixtures::matches_country(&d.country, &d.country_iso, &country))
        .filter(|d| {
            d.date
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
                .is_some_and(|date| range.from <= date && date <= range.to)
        })
        .cloned()
        .collect();
    Ok(Json(days))
}

/// Unknown countries get a 200 with a message body, as the live service does.
async fn travel(State(db): State<Db>, Path(country): Path<String>) -> Json<serde_json::Value> {
    let info = db
        .travel
        .iter()
        .find(|t| Fixtures::matches_country(&t.country.name, &t.country.id, &country));
    match info {
        Some(info) => Json(json!(info)),
        None => Json(json!({ "message": "for this country travel information is not available" })),
    }
}

async fn summary(State(db): State<Db>) -> Json<Summary> {
    Json(db.summary.clone())
}
