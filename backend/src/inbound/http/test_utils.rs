//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;

use crate::domain::PasswordHash;
use crate::domain::ports::{GridRepository, PasswordHasher, PasswordHasherError};
use crate::outbound::memory::InMemoryStore;

use super::configure;
use super::state::HttpState;

/// Session middleware with a fresh key, named `session`, without `Secure`.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Full route table over `state` behind a test session middleware.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .configure(configure)
}

/// The session cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// `Location` header of a redirect.
pub fn location<B>(response: &ServiceResponse<B>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect has a location")
}

/// Carries the latest session cookie between requests, like a browser.
#[derive(Default)]
pub struct CookieJar(Option<Cookie<'static>>);

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the current cookie, if any, to `request`.
    pub fn attach(&self, request: TestRequest) -> TestRequest {
        match &self.0 {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        }
    }

    /// Keep the cookie `response` set, if it set one.
    pub fn update<B>(&mut self, response: &ServiceResponse<B>) {
        if let Some(cookie) = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.0 = Some(cookie.into_owned());
        }
    }
}

/// Send a GET through `jar`.
pub async fn get<S>(app: &S, jar: &mut CookieJar, uri: &str) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = jar.attach(TestRequest::get().uri(uri)).to_request();
    let response = test::call_service(app, request).await;
    jar.update(&response);
    response
}

/// Submit a url-encoded form through `jar`.
pub async fn post_form<S>(
    app: &S,
    jar: &mut CookieJar,
    uri: &str,
    form: &[(&str, &str)],
) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = jar
        .attach(TestRequest::post().uri(uri).set_form(form))
        .to_request();
    let response = test::call_service(app, request).await;
    jar.update(&response);
    response
}

/// Register `login` (display name upper-cased), sign in and drain the
/// resulting flash messages.
pub async fn sign_up<S>(app: &S, jar: &mut CookieJar, login: &str, password: &str)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let name = login.to_uppercase();
    let response = post_form(
        app,
        jar,
        "/register",
        &[
            ("name", name.as_str()),
            ("login", login),
            ("password", password),
            ("password_confirm", password),
        ],
    )
    .await;
    assert_eq!(location(&response), "/login", "registration redirects");
    let response = post_form(
        app,
        jar,
        "/login",
        &[("login", login), ("password", password)],
    )
    .await;
    assert_eq!(location(&response), "/", "sign-in redirects home");
    let response = get(app, jar, "/").await;
    assert!(response.status().is_success(), "grid view loads");
}

/// Reversible "hash" so handler tests skip Argon2 cost.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        Ok(PasswordHash::new(format!("plain:{password}")))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        hash.as_str().strip_prefix("plain:") == Some(password)
    }
}

/// State over an initialised in-memory store, returned with the store.
pub async fn memory_state() -> (HttpState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    store.initialize().await.expect("initialise cells");
    let state = HttpState::from_adapters(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::new(PlainHasher),
    );
    (state, store)
}
