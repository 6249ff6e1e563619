//! Client configuration.
//!
//! The access token is never compiled in: callers either build a
//! `ClientConfig` directly or read it from the environment with
//! `ClientConfig::from_env`.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.covid19api.com";
pub const DEFAULT_USER_AGENT: &str = "TouristBot/1.1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_ACCESS_TOKEN: &str = "TOURIST_ACCESS_TOKEN";
pub const ENV_BASE_URL: &str = "TOURIST_BASE_URL";
pub const ENV_USER_AGENT: &str = "TOURIST_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "TOURIST_TIMEOUT_SECS";

/// Credentials and connection settings, fixed once a client owns them.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub access_token: String,
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Skip TLS certificate verification. Off unless explicitly enabled.
    pub danger_accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            danger_accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Read configuration from `TOURIST_*` environment variables.
    ///
    /// `TOURIST_ACCESS_TOKEN` is required; the base URL, user agent and
    /// timeout fall back to their defaults when unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ENV_ACCESS_TOKEN)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_ACCESS_TOKEN} is not set")))?;

        let mut config = Self::new(access_token);
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url);
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = user_agent;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"))
            })?;
            if secs == 0 {
                return Err(ApiError::Config(format!("{ENV_TIMEOUT_SECS} must be at least 1 second")));
            }
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("X-Access-Token".to_string(), self.access_token.clone()),
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), "application/json".to_string()),
        ]
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("danger_accept_invalid_certs", &self.danger_accept_invalid_certs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_verify_tls() {
        let config = ClientConfig::new("token");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.danger_accept_invalid_certs);
    }

    #[test]
    fn headers_carry_token_agent_and_accept() {
        let headers = ClientConfig::new("abc").headers();
        assert_eq!(
            headers,
            vec![
                ("X-Access-Token".to_string(), "abc".to_string()),
                ("User-Agent".to_string(), "TouristBot/1.1".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ]
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("t").with_base_url("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn debug_redacts_token() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn env_requires_token() {
        let err = ClientConfig::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        let err = ClientConfig::from_lookup(env(&[(ENV_ACCESS_TOKEN, "  ")])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn env_overrides_defaults() {
        let config = ClientConfig::from_lookup(env(&[
            (ENV_ACCESS_TOKEN, "from-env"),
            (ENV_BASE_URL, "http://127.0.0.1:9999/"),
            (ENV_USER_AGENT, "Tester/0.1"),
            (ENV_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();
        assert_eq!(config.access_token, "from-env");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.user_agent, "Tester/0.1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn env_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(env(&[(ENV_ACCESS_TOKEN, "t"), (ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        let err = ClientConfig::from_lookup(env(&[(ENV_ACCESS_TOKEN, "t"), (ENV_TIMEOUT_SECS, "0")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }
}
