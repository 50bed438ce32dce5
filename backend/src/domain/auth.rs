//! Authentication primitives: sign-in credentials, registrations and stored
//! password hashes.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Credits, DisplayName, Login, User, UserId, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Login was missing or blank once trimmed.
    #[error("login must not be empty")]
    EmptyLogin,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `login` is trimmed and must not be empty after trimming.
/// - `password` is non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use citygrid::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "secret").unwrap();
/// assert_eq!(creds.login(), "alice");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    login: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw login/password inputs.
    pub fn try_from_parts(login: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = login.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyLogin);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            login: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login string suitable for user lookups.
    pub fn login(&self) -> &str {
        self.login.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a registration form is rejected before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// A required field was blank.
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    /// The password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
    /// The name or login failed value validation.
    #[error(transparent)]
    InvalidValue(#[from] UserValidationError),
}

/// Validated request to open a new account.
///
/// # Examples
/// ```
/// use citygrid::domain::Registration;
///
/// let registration = Registration::try_from_parts("Alice", "alice", "pw", "pw").unwrap();
/// assert_eq!(registration.login().as_str(), "alice");
///
/// assert!(Registration::try_from_parts("Alice", "alice", "pw", "other").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    login: Login,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw form values.
    ///
    /// Blank fields are reported before a password mismatch, and the
    /// password itself is kept verbatim.
    pub fn try_from_parts(
        name: &str,
        login: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let fields = [
            ("name", name.trim()),
            ("login", login.trim()),
            ("password", password),
            ("password confirmation", password_confirm),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
            return Err(RegistrationValidationError::MissingField { field });
        }
        if password != password_confirm {
            return Err(RegistrationValidationError::PasswordMismatch);
        }

        Ok(Self {
            name: DisplayName::new(name)?,
            login: Login::new(login)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Requested login.
    pub fn login(&self) -> &Login {
        &self.login
    }

    /// Plain-text password, wiped on drop.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// One-way password hash in PHC string format.
///
/// `Debug` never prints the hash itself.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a password hasher or read from storage.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded form for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Identity established by a successful sign-in.
///
/// Carries the snapshot a session caches for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account identifier.
    pub id: UserId,
    /// Display name.
    pub name: DisplayName,
    /// Balance at sign-in time.
    pub balance: Credits,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            name: user.name().clone(),
            balance: user.balance(),
        }
    }
}
