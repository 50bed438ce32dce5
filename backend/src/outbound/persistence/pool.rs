//! bb8 pool of `diesel-async` PostgreSQL connections.
//!
//! Checkout waits at most the configured timeout, after which callers get a
//! [`PoolError::Checkout`] that the repositories surface as a connection
//! failure.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Errors raised while building the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    /// Checkout failure.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Construction failure.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Pool sizing and timeouts.
///
/// ```
/// use std::time::Duration;
/// use citygrid::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://grid:secret@db/citygrid")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(2));
/// assert_eq!(config.redacted_url(), "postgres://***@db/citygrid");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Ten connections, none kept idle, five second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: None,
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Cap the number of open connections. Zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    /// Keep at least this many idle connections open.
    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    /// How long checkout may wait for a free connection.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Connection string as configured.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Connection string with any credentials masked, for logging.
    pub fn redacted_url(&self) -> String {
        let url = self.database_url.as_str();
        let Some((scheme, rest)) = url.split_once("://") else {
            return url.to_owned();
        };
        match rest.rsplit_once('@') {
            Some((_, host)) => format!("{scheme}://***@{host}"),
            None => url.to_owned(),
        }
    }
}

/// Shared handle to the connection pool. Cloning is cheap.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool. Connections are opened lazily unless `min_idle` asks
    /// for warm ones.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when bb8 rejects the configuration or
    /// cannot open the idle connections.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url);

        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when none is available before the
    /// timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_lazy_and_bounded() {
        let config = PoolConfig::new("postgres://localhost/citygrid");

        assert_eq!(config.max_size, 10);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[rstest]
    fn zero_max_size_is_raised() {
        let config = PoolConfig::new("postgres://localhost/citygrid").with_max_size(0);
        assert_eq!(config.max_size, 1);
    }

    #[rstest]
    #[case("postgres://user:pw@host:5432/db", "postgres://***@host:5432/db")]
    #[case("postgres://host/db", "postgres://host/db")]
    #[case("host=localhost dbname=citygrid", "host=localhost dbname=citygrid")]
    fn credentials_are_masked(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(PoolConfig::new(url).redacted_url(), expected);
    }

    #[rstest]
    fn errors_carry_their_cause() {
        assert!(
            PoolError::checkout("timed out")
                .to_string()
                .contains("timed out")
        );
        assert!(PoolError::build("bad url").to_string().contains("bad url"));
    }
}
