//! Synchronous client for the covid19api.com statistics service.
//!
//! # Overview
//! `TouristClient` queries per-country daily case and death figures, travel
//! advisory levels, and worldwide totals. Each query is a single blocking
//! GET; nothing is cached or retried.
//!
//! # Design
//! - Endpoints are split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the I/O boundary is explicit
//!   and every parser can be tested without a network.
//! - The round-trip goes through the `Transport` trait. `UreqTransport` is
//!   the default: TLS verification on, global timeout from `ClientConfig`.
//! - Credentials come from `ClientConfig`, built directly or from the
//!   environment.
//! - Failures are typed `ApiError` values; see `error` for the taxonomy.

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{Metric, TouristClient};
pub use clock::{lag_corrected, Clock, FixedClock, SystemClock};
pub use config::ClientConfig;
pub use error::ApiError;
pub use format::{format_number, round_to_nearest};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use transport::UreqTransport;
pub use types::{DailyRecord, GlobalTotals, TravelRestriction};
