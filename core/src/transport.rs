//! Blocking `Transport` backed by a `ureq` agent.

use tracing::{debug, warn};
use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Executes requests over HTTPS with certificate verification and a global
/// timeout taken from `ClientConfig`.
///
/// The agent pools connections, so one instance should serve every call a
/// client makes.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        if config.danger_accept_invalid_certs {
            warn!(base_url = %config.base_url, "TLS certificate verification is disabled");
        }
        let tls = TlsConfig::builder()
            .disable_verification(config.danger_accept_invalid_certs)
            .build();
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .tls_config(tls)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(url = %request.url, "sending GET");

        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(|e| {
            warn!(url = %request.url, error = %e, "request failed");
            ApiError::transport(&request.url, e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::transport(&request.url, e))?;

        debug!(url = %request.url, http.status_code = status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
