//! Registration, sign-in and sign-out.
//!
//! ```text
//! GET  /register            -> {"currentUser":null,"flashes":[...]}
//! POST /register  name=..&login=..&password=..&password_confirm=..
//! GET  /login
//! POST /login     login=..&password=..
//! GET  /logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use crate::domain::{
    Error, LoginCredentials, Registration, RegistrationValidationError, STARTING_BALANCE,
};

use super::ApiResult;
use super::flash::{Flash, recover, redirect_with};
use super::session::SessionContext;
use super::state::HttpState;

/// Registration form fields. Missing fields read as empty.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl Drop for RegisterForm {
    fn drop(&mut self) {
        self.password.zeroize();
        self.password_confirm.zeroize();
    }
}

/// Sign-in form fields.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

impl Drop for LoginForm {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// Data behind the registration and sign-in pages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub current_user: Option<String>,
    pub flashes: Vec<Flash>,
}

fn form_view(session: &SessionContext) -> ApiResult<web::Json<FormView>> {
    Ok(web::Json(FormView {
        current_user: session.user_name()?,
        flashes: session.take_flashes(),
    }))
}

fn registration_error(err: &RegistrationValidationError) -> Error {
    match err {
        RegistrationValidationError::MissingField { .. } => {
            Error::invalid_request("Please fill in all fields.")
        }
        RegistrationValidationError::PasswordMismatch => {
            Error::invalid_request("Passwords do not match.")
        }
        RegistrationValidationError::InvalidValue(inner) => {
            Error::invalid_request(format!("Invalid registration: {inner}."))
        }
    }
}

#[get("/register")]
pub async fn register_page(session: SessionContext) -> ApiResult<web::Json<FormView>> {
    form_view(&session)
}

/// Open an account. Success and a taken login both continue to the sign-in
/// page; invalid input returns to the form.
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let registration = match Registration::try_from_parts(
        &form.name,
        &form.login,
        &form.password,
        &form.password_confirm,
    ) {
        Ok(registration) => registration,
        Err(err) => {
            debug!(error = %err, "registration form rejected");
            return recover(&session, registration_error(&err), "/register");
        }
    };

    match state.accounts.register(&registration).await {
        Ok(_) => redirect_with(
            &session,
            Flash::success(format!(
                "Registration complete! {} credits have been added to your account. Please sign in.",
                STARTING_BALANCE.get()
            )),
            "/login",
        ),
        Err(err) => recover(&session, err, "/login"),
    }
}

#[get("/login")]
pub async fn login_page(session: SessionContext) -> ApiResult<web::Json<FormView>> {
    form_view(&session)
}

/// Verify credentials and bind the session to the account.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let credentials = match LoginCredentials::try_from_parts(&form.login, &form.password) {
        Ok(credentials) => credentials,
        Err(err) => {
            debug!(error = %err, "sign-in form rejected");
            return recover(
                &session,
                Error::invalid_request("Please enter your login and password."),
                "/login",
            );
        }
    };

    match state.accounts.authenticate(&credentials).await {
        Ok(user) => {
            session.sign_in(&user)?;
            redirect_with(&session, Flash::success("Signed in."), "/")
        }
        Err(err) => recover(&session, err, "/login"),
    }
}

/// Drop the session unconditionally.
#[get("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    redirect_with(&session, Flash::success("Signed out."), "/")
}
