//! Request builder, response parser and convenience queries for covid19api.com.
//!
//! # Design
//! Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Both halves are pure. The `get_*` methods join them through the
//! client's `Transport`, so the same code paths run against the real API,
//! the mock server, or a closure in a unit test.
//!
//! Response bodies are decoded in two steps: text to `serde_json::Value`
//! (failure is `Decode`), then value to the typed wire struct (failure is
//! `Schema`). Keeping the steps apart lets callers tell a broken body from
//! a changed upstream format.

use std::fmt;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::{lag_corrected, Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;
use crate::types::{
    parse_date, parse_timestamp, CountryDay, DailyRecord, GlobalTotals, SummaryResponse, TravelResponse,
    TravelRestriction,
};

/// Which daily count a country query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cases,
    Deaths,
}

impl Metric {
    fn of(self, day: &CountryDay) -> i64 {
        match self {
            Metric::Cases => day.new_cases,
            Metric::Deaths => day.new_deaths,
        }
    }
}

/// Synchronous client for the covid19api.com statistics service.
pub struct TouristClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for TouristClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouristClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TouristClient {
    /// Client using the blocking `ureq` transport and the local clock.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, transport)
    }

    /// Client configured from `TOURIST_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        ClientConfig::from_env().map(Self::new)
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used by the date-lag correction.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// GET request for a path relative to the base URL. `endpoint` may carry
    /// a query string.
    pub fn build_request(&self, endpoint: &str) -> HttpRequest {
        HttpRequest {
            url: format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                endpoint.trim_start_matches('/')
            ),
            headers: self.config.headers(),
        }
    }

    /// Daily figures for `country` between `from` and `to`, sent as given.
    pub fn build_country_request(&self, country: &str, from: NaiveDate, to: NaiveDate) -> HttpRequest {
        self.build_request(&format!(
            "premium/country/{}?from={}&to={}",
            urlencoding::encode(country),
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d"),
        ))
    }

    pub fn build_travel_request(&self, country: &str) -> HttpRequest {
        self.build_request(&format!("premium/travel/country/{}", urlencoding::encode(country)))
    }

    pub fn build_summary_request(&self) -> HttpRequest {
        self.build_request("summary")
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    /// Decode any successful response into a JSON value.
    pub fn parse_json(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(ApiError::Decode)
    }

    pub fn parse_country_days(&self, response: HttpResponse) -> Result<Vec<CountryDay>, ApiError> {
        decode(self.parse_json(response)?, "country daily figures")
    }

    /// Per-day records for `metric`, in upstream order.
    pub fn parse_daily_records(&self, response: HttpResponse, metric: Metric) -> Result<Vec<DailyRecord>, ApiError> {
        self.parse_country_days(response)?
            .iter()
            .map(|day| -> Result<DailyRecord, ApiError> {
                Ok(DailyRecord {
                    date: parse_date(&day.date)?,
                    confirmed: metric.of(day),
                })
            })
            .collect()
    }

    /// Sum of `metric` over every returned day; zero for an empty range.
    pub fn parse_total(&self, response: HttpResponse, metric: Metric) -> Result<i64, ApiError> {
        self.parse_country_days(response)?
            .iter()
            .try_fold(0_i64, |total, day| total.checked_add(metric.of(day)))
            .ok_or_else(|| ApiError::Schema(format!("{metric:?} total overflows i64")))
    }

    pub fn parse_travel(&self, response: HttpResponse) -> Result<TravelRestriction, ApiError> {
        let travel: TravelResponse = decode(self.parse_json(response)?, "travel restrictions")?;
        Ok(TravelRestriction {
            level: travel.level.level,
            description: travel.level.level_desc,
            timestamp: parse_timestamp(&travel.country.timestamp)?,
        })
    }

    pub fn parse_summary(&self, response: HttpResponse) -> Result<GlobalTotals, ApiError> {
        let summary: SummaryResponse = decode(self.parse_json(response)?, "global summary")?;
        let global = summary.global;
        Ok(GlobalTotals {
            new_cases: global.new_confirmed,
            total_cases: global.total_confirmed,
            new_deaths: global.new_deaths,
            total_deaths: global.total_deaths,
            timestamp: parse_timestamp(&global.date)?,
        })
    }

    // -----------------------------------------------------------------------
    // Round trips
    // -----------------------------------------------------------------------

    /// GET `endpoint` and return the decoded JSON body.
    pub fn make_request(&self, endpoint: &str) -> Result<Value, ApiError> {
        let response = self.transport.execute(&self.build_request(endpoint))?;
        self.parse_json(response)
    }

    /// `to_date`, moved back a day when it is today and still morning.
    pub fn to_date_fix(&self, to_date: NaiveDate) -> NaiveDate {
        let fixed = lag_corrected(to_date, self.clock.now());
        if fixed != to_date {
            debug!(requested = %to_date, using = %fixed, "applying reporting-lag correction");
        }
        fixed
    }

    fn fetch_country(&self, country: &str, from: NaiveDate, to: NaiveDate) -> Result<HttpResponse, ApiError> {
        let request = self.build_country_request(country, from, self.to_date_fix(to));
        self.transport.execute(&request)
    }

    pub fn get_cases(&self, country: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyRecord>, ApiError> {
        self.parse_daily_records(self.fetch_country(country, from, to)?, Metric::Cases)
    }

    pub fn get_total_cases(&self, country: &str, from: NaiveDate, to: NaiveDate) -> Result<i64, ApiError> {
        self.parse_total(self.fetch_country(country, from, to)?, Metric::Cases)
    }

    pub fn get_deaths(&self, country: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyRecord>, ApiError> {
        self.parse_daily_records(self.fetch_country(country, from, to)?, Metric::Deaths)
    }

    pub fn get_total_deaths(&self, country: &str, from: NaiveDate, to: NaiveDate) -> Result<i64, ApiError> {
        self.parse_total(self.fetch_country(country, from, to)?, Metric::Deaths)
    }

    pub fn get_travel_restrictions(&self, country: &str) -> Result<TravelRestriction, ApiError> {
        self.parse_travel(self.transport.execute(&self.build_travel_request(country))?)
    }

    pub fn get_global_totals(&self) -> Result<GlobalTotals, ApiError> {
        self.parse_summary(self.transport.execute(&self.build_summary_request())?)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "upstream returned an error status");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Schema(format!("{what}: {e}")))
}
