//! Flash messages and the redirect responses that carry them.
//!
//! Every form route answers with `303 See Other`; the outcome travels to the
//! next view as a flash message stored in the session.

use actix_web::{HttpResponse, http::header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Error, ErrorCode};

use super::ApiResult;
use super::session::SessionContext;

const GENERIC_FAILURE: &str = "Something went wrong. Try again.";

/// Flash severity, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

/// One-shot status message shown by the next view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&Error> for Flash {
    fn from(error: &Error) -> Self {
        match error.code() {
            ErrorCode::InternalError => Self::error(GENERIC_FAILURE),
            _ => Self::error(error.message()),
        }
    }
}

/// Bare `303 See Other` to `location`.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Queue `flash` and redirect to `location`.
pub fn redirect_with(
    session: &SessionContext,
    flash: Flash,
    location: &str,
) -> ApiResult<HttpResponse> {
    session.push_flash(flash)?;
    Ok(see_other(location))
}

/// Turn a domain failure into a flash and a redirect.
///
/// Authentication failures drop the session and send the browser to the
/// login form; everything else lands on `fallback`.
pub fn recover(session: &SessionContext, error: Error, fallback: &str) -> ApiResult<HttpResponse> {
    debug!(code = ?error.code(), message = error.message(), "request recovered as flash");
    if error.code() == ErrorCode::Unauthorized {
        session.clear();
        return redirect_with(session, Flash::from(&error), "/login");
    }
    redirect_with(session, Flash::from(&error), fallback)
}
