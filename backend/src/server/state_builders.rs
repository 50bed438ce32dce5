//! Select storage adapters and wire them into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use citygrid::domain::ports::{GridRepository, GridRepositoryError, UserRepository};
use citygrid::inbound::http::state::HttpState;
use citygrid::outbound::crypto::Argon2PasswordHasher;
use citygrid::outbound::memory::InMemoryStore;
use citygrid::outbound::persistence::{DbPool, DieselGridRepository, DieselUserRepository};

use super::ServerConfig;

/// Insert any missing cells, then build the state over the same adapters.
async fn initialised_state<R, G>(users: Arc<R>, grid: Arc<G>) -> std::io::Result<HttpState>
where
    R: UserRepository + 'static,
    G: GridRepository + 'static,
{
    let inserted = grid.initialize().await.map_err(init_error)?;
    info!(inserted, "grid initialised");
    Ok(HttpState::from_adapters(
        users,
        grid,
        Arc::new(Argon2PasswordHasher::new()),
    ))
}

fn init_error(err: GridRepositoryError) -> std::io::Error {
    std::io::Error::other(format!("grid initialisation failed: {err}"))
}

async fn diesel_state(pool: &DbPool) -> std::io::Result<HttpState> {
    initialised_state(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselGridRepository::new(pool.clone())),
    )
    .await
}

async fn memory_state() -> std::io::Result<HttpState> {
    let store = Arc::new(InMemoryStore::new());
    initialised_state(Arc::clone(&store), store).await
}

/// Build the shared HTTP state, using PostgreSQL when a pool is configured
/// and the in-memory store otherwise.
pub(super) async fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "selecting storage");
            diesel_state(pool).await?
        }
        None => {
            info!(store = "memory", "selecting storage; data is lost on restart");
            memory_state().await?
        }
    };
    Ok(web::Data::new(state))
}
