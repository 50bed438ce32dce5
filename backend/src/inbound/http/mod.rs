//! HTTP inbound adapter.
//!
//! Form routes always answer with a redirect and a flash message; page
//! routes return JSON view models.

use actix_web::web;

pub mod accounts;
pub mod balance;
pub mod cells;
pub mod error;
pub mod flash;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

pub use error::ApiResult;

/// Register every page and form route.
///
/// Callers provide `web::Data<HttpState>` and a session middleware; health
/// probes are registered separately because they need their own state.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(views::index)
        .service(views::profile)
        .service(views::pricing)
        .service(accounts::register_page)
        .service(accounts::register)
        .service(accounts::login_page)
        .service(accounts::login)
        .service(accounts::logout)
        .service(cells::build)
        .service(cells::toggle)
        .service(balance::top_up);
}
