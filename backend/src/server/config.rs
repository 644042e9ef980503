//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use surflog::outbound::persistence::DbPool;
use surflog::settings::{Settings, SettingsError};
use url::Url;

/// Base URLs and timeouts for the external surf API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub(crate) primary_base: Url,
    pub(crate) direct_base: Url,
    pub(crate) proxy_timeout: Duration,
    pub(crate) chain_proxy_timeout: Duration,
    pub(crate) direct_timeout: Duration,
}

impl UpstreamConfig {
    /// Resolve the upstream section of the loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when either base URL is unusable.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        Ok(Self {
            primary_base: settings.api_base_url()?,
            direct_base: settings.direct_api_base_url()?,
            proxy_timeout: settings.proxy_timeout(),
            chain_proxy_timeout: settings.chain_proxy_timeout(),
            direct_timeout: settings.direct_timeout(),
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upstream: UpstreamConfig,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, upstream: UpstreamConfig) -> Self {
        Self {
            bind_addr,
            upstream,
            db_pool: None,
        }
    }

    /// Attach a pool so fallback sessions are written to PostgreSQL rather
    /// than kept in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
