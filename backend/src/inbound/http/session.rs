//! Session helpers keeping handlers free of cookie plumbing.
//!
//! The session holds the signed-in user's id, a display-only copy of their
//! name and balance, and the queue of pending flash messages.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthenticatedUser, Credits, Error, UserId};

use super::flash::Flash;

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_NAME_KEY: &str = "user_name";
pub(crate) const BALANCE_KEY: &str = "balance";
pub(crate) const FLASH_KEY: &str = "flash";

/// Message shown when a signed-in route is hit anonymously.
pub(crate) const SIGN_IN_FIRST: &str = "Please sign in first.";

fn write_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to write session: {error}"))
}

fn read_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

/// Newtype over the Actix session exposing the operations handlers need.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session to `user`, issuing a fresh session cookie.
    ///
    /// Pending flash messages survive the renewal.
    pub fn sign_in(&self, user: &AuthenticatedUser) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id.get())
            .map_err(write_failed)?;
        self.0
            .insert(USER_NAME_KEY, user.name.as_str())
            .map_err(write_failed)?;
        self.set_balance(user.balance)
    }

    /// Signed-in user id. A malformed stored id reads as anonymous.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self.0.get::<i32>(USER_ID_KEY).map_err(read_failed)? else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Signed-in user id, or `unauthorized` when anonymous.
    pub fn require_user(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized(SIGN_IN_FIRST))
    }

    /// Display name cached at sign-in.
    pub fn user_name(&self) -> Result<Option<String>, Error> {
        self.0.get::<String>(USER_NAME_KEY).map_err(read_failed)
    }

    /// Balance last written to the session. Display only.
    pub fn cached_balance(&self) -> Result<Option<Credits>, Error> {
        self.0
            .get::<i64>(BALANCE_KEY)
            .map(|balance| balance.map(Credits::new))
            .map_err(read_failed)
    }

    pub fn set_balance(&self, balance: Credits) -> Result<(), Error> {
        self.0
            .insert(BALANCE_KEY, balance.get())
            .map_err(write_failed)
    }

    /// Queue a message for the next view.
    pub fn push_flash(&self, flash: Flash) -> Result<(), Error> {
        let mut pending = self
            .0
            .get::<Vec<Flash>>(FLASH_KEY)
            .map_err(read_failed)?
            .unwrap_or_default();
        pending.push(flash);
        self.0.insert(FLASH_KEY, pending).map_err(write_failed)
    }

    /// Drain queued messages. Undecodable queues are dropped.
    pub fn take_flashes(&self) -> Vec<Flash> {
        match self.0.remove_as::<Vec<Flash>>(FLASH_KEY) {
            Some(Ok(flashes)) => flashes,
            Some(Err(raw)) => {
                warn!(len = raw.len(), "discarding undecodable flash messages");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Forget the signed-in user and any pending messages.
    pub fn clear(&self) {
        self.0.clear();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
