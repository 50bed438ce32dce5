//! Backend entry-point: loads settings, selects storage and serves the grid.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use citygrid::config::AppSettings;
use citygrid::inbound::http::health::HealthState;
use citygrid::inbound::http::session_config::{BuildMode, session_settings_from_env};
use citygrid::outbound::persistence::DbPool;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("invalid session settings: {e}")))?;
    info!(fingerprint = %session.fingerprint(), "session key loaded");

    let mut config = ServerConfig::new(session, settings.bind_addr());
    if let Some(pool_config) = settings.pool_config(&env) {
        info!(database = %pool_config.redacted_url(), "connecting to database");
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::make_metrics());

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting server");
    let server = create_server(health_state.clone(), config).await?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
