//! Application settings loaded via OrthoConfig.
//!
//! Values come from `CITYGRID_*` environment variables, a config file or CLI
//! flags. Session settings are loaded separately; see
//! [`crate::inbound::http::session_config`].

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Fallback variable consulted when `CITYGRID_DATABASE_URL` is unset.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CITYGRID")]
pub struct AppSettings {
    /// Address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl AppSettings {
    /// Configured bind address, or `0.0.0.0:8080`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_PORT,
        )))
    }

    /// Configured database URL, falling back to `DATABASE_URL`. Blank values
    /// count as unset.
    pub fn database_url(&self, env: &impl Env) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env.string(DATABASE_URL_ENV))
            .filter(|url| !url.trim().is_empty())
    }

    /// Pool settings for the configured database, if any.
    pub fn pool_config(&self, env: &impl Env) -> Option<PoolConfig> {
        self.database_url(env).map(|url| {
            PoolConfig::new(url).with_max_size(
                self.db_max_connections
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            )
        })
    }
}
