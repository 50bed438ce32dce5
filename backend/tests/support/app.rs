//! Full application harness over the in-memory store.
//!
//! Integration tests compile as separate crates, so the library's
//! `#[cfg(test)]` helpers are out of reach; this module rebuilds the few
//! pieces they need.

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use serde_json::Value;

use citygrid::Trace;
use citygrid::domain::PasswordHash;
use citygrid::domain::ports::{GridRepository, PasswordHasher, PasswordHasherError};
use citygrid::inbound::http::configure;
use citygrid::inbound::http::session_config::{COOKIE_NAME, SessionSettings};
use citygrid::inbound::http::state::HttpState;
use citygrid::outbound::memory::InMemoryStore;

/// Cheap reversible stand-in for Argon2.
struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("plain:{password}")))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        hash.as_str().strip_prefix("plain:") == Some(password)
    }
}

/// Initialise a fresh store and wrap the full route table around it.
pub async fn init_app()
-> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let store = Arc::new(InMemoryStore::new());
    store.initialize().await.expect("initialise grid");
    let state = HttpState::from_adapters(Arc::clone(&store), store, Arc::new(PlainHasher));
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    };

    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("").wrap(session.middleware()).configure(configure)),
    )
    .await
}

/// One browser: the latest session cookie it was given.
#[derive(Default)]
pub struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    /// A second tab sharing this browser's current session.
    pub fn clone_session(&self) -> Self {
        Self {
            cookie: self.cookie.clone(),
        }
    }

    fn prepare(&self, request: TestRequest) -> Request {
        match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()).to_request(),
            None => request.to_request(),
        }
    }

    fn remember(&mut self, response: &ServiceResponse) {
        if let Some(cookie) = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == COOKIE_NAME)
        {
            self.cookie = Some(cookie.into_owned());
        }
    }

    pub async fn get<S>(&mut self, app: &S, uri: &str) -> ServiceResponse
    where
        S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let response = test::call_service(app, self.prepare(TestRequest::get().uri(uri))).await;
        self.remember(&response);
        response
    }

    /// POST a form and return the redirect target.
    pub async fn submit<S>(&mut self, app: &S, uri: &str, form: &[(&str, &str)]) -> String
    where
        S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let request = self.prepare(TestRequest::post().uri(uri).set_form(form));
        let response = test::call_service(app, request).await;
        self.remember(&response);
        assert_eq!(response.status(), 303, "form posts redirect");
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("redirect location")
            .to_owned()
    }

    /// GET a JSON page.
    pub async fn page<S>(&mut self, app: &S, uri: &str) -> Value
    where
        S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let response = self.get(app, uri).await;
        assert!(response.status().is_success(), "{uri} renders");
        test::read_body_json(response).await
    }

    /// Register and sign in, leaving no pending flash messages.
    pub async fn sign_up<S>(&mut self, app: &S, name: &str, login: &str, password: &str)
    where
        S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let target = self
            .submit(
                app,
                "/register",
                &[
                    ("name", name),
                    ("login", login),
                    ("password", password),
                    ("password_confirm", password),
                ],
            )
            .await;
        assert_eq!(target, "/login");
        let target = self
            .submit(app, "/login", &[("login", login), ("password", password)])
            .await;
        assert_eq!(target, "/");
        self.page(app, "/").await;
    }
}

/// Message of the newest flash on `page`.
pub fn last_flash(page: &Value) -> String {
    page["flashes"]
        .as_array()
        .and_then(|flashes| flashes.last())
        .and_then(|flash| flash["message"].as_str())
        .unwrap_or_default()
        .to_owned()
}
