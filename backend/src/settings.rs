//! Service configuration loaded via OrthoConfig.
//!
//! Values layer CLI flags over `SURFLOG_*` environment variables over an
//! optional config file. Timeouts carry OrthoConfig defaults; the remaining
//! fields are optional and fall back to the constants below.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/";

/// Error raised when a configured URL cannot be used as a base.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct SettingsError {
    pub field: &'static str,
    pub message: String,
}

/// Runtime settings for the surf session backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SURFLOG")]
pub struct Settings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Primary data source tried first by the fetch chain.
    pub api_base_url: Option<String>,
    /// External API reached directly by the proxies and the typed client.
    /// Defaults to `api_base_url`.
    pub direct_api_base_url: Option<String>,
    /// Timeout for the proxy routes.
    #[ortho_config(default = 20)]
    pub proxy_timeout_secs: u64,
    /// Timeout for the fetch chain's primary step.
    #[ortho_config(default = 15)]
    pub chain_proxy_timeout_secs: u64,
    /// Timeout for direct API calls.
    #[ortho_config(default = 10)]
    pub direct_timeout_secs: u64,
    /// PostgreSQL URL for the fallback session table. Without it, fallback
    /// rows live in memory.
    pub database_url: Option<String>,
}

fn parse_base(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    let mut url = Url::parse(raw.trim()).map_err(|err| SettingsError {
        field,
        message: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SettingsError {
            field,
            message: format!("{raw} cannot be used as a base URL"),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl Settings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Primary base URL, normalised to end with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the value is not an absolute URL.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        parse_base(
            "api_base_url",
            self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
        )
    }

    /// Direct base URL, normalised to end with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the value is not an absolute URL.
    pub fn direct_api_base_url(&self) -> Result<Url, SettingsError> {
        match self.direct_api_base_url.as_deref() {
            Some(raw) => parse_base("direct_api_base_url", raw),
            None => self.api_base_url(),
        }
    }

    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_timeout_secs)
    }

    pub fn chain_proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.chain_proxy_timeout_secs)
    }

    pub fn direct_timeout(&self) -> Duration {
        Duration::from_secs(self.direct_timeout_secs)
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
