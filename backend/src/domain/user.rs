//! User identity, display data and account balance.
//!
//! Identifiers are assigned by the store; names and logins are validated here
//! so every adapter stores the same normalised values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;
/// Maximum number of characters accepted for a login.
pub const LOGIN_MAX: usize = 64;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifiers are positive integers.
    #[error("user id must be positive, got {0}")]
    InvalidId(i32),
    /// Display name was blank once trimmed.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// Display name exceeded [`DISPLAY_NAME_MAX`] characters.
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    /// Login was blank once trimmed.
    #[error("login must not be empty")]
    EmptyLogin,
    /// Login exceeded [`LOGIN_MAX`] characters.
    #[error("login must be at most {max} characters")]
    LoginTooLong { max: usize },
}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use citygrid::domain::UserId;
    ///
    /// assert_eq!(UserId::new(7).map(|id| id.get()), Ok(7));
    /// assert!(UserId::new(0).is_err());
    /// ```
    pub fn new(raw: i32) -> Result<Self, UserValidationError> {
        if raw <= 0 {
            return Err(UserValidationError::InvalidId(raw));
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn normalise(
    raw: &str,
    max: usize,
    empty: UserValidationError,
    too_long: UserValidationError,
) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Name shown on the grid next to a user's buildings.
///
/// ## Invariants
/// - Trimmed, non-empty and at most [`DISPLAY_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and normalise a display name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        normalise(
            raw.as_ref(),
            DISPLAY_NAME_MAX,
            UserValidationError::EmptyDisplayName,
            UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            },
        )
        .map(Self)
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique sign-in handle.
///
/// ## Invariants
/// - Trimmed, non-empty and at most [`LOGIN_MAX`] characters.
/// - Compared byte for byte; uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Login(String);

impl Login {
    /// Validate and normalise a login.
    ///
    /// # Examples
    /// ```
    /// use citygrid::domain::Login;
    ///
    /// let login = Login::new("  alice ").expect("valid login");
    /// assert_eq!(login.as_str(), "alice");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        normalise(
            raw.as_ref(),
            LOGIN_MAX,
            UserValidationError::EmptyLogin,
            UserValidationError::LoginTooLong { max: LOGIN_MAX },
        )
        .map(Self)
    }

    /// Borrow the login.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Login {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Login> for String {
    fn from(value: Login) -> Self {
        value.0
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whole units of the in-game currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credits(i64);

impl Credits {
    /// Wrap a raw amount.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Raw amount.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Add two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Subtract `other`, returning `None` when the result would be negative.
    ///
    /// # Examples
    /// ```
    /// use citygrid::domain::Credits;
    ///
    /// assert_eq!(Credits::new(150).debit(Credits::new(100)), Some(Credits::new(50)));
    /// assert_eq!(Credits::new(50).debit(Credits::new(100)), None);
    /// ```
    #[must_use]
    pub const fn debit(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(rest) if rest >= 0 => Some(Self(rest)),
            _ => None,
        }
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Balance credited to every new account.
pub const STARTING_BALANCE: Credits = Credits::new(1000);
/// Amount added by a single top-up.
pub const TOP_UP_AMOUNT: Credits = Credits::new(1000);

/// Registered account as seen by the domain.
///
/// The password hash is not carried here; credential checks go through
/// the user repository and the password hasher port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    login: Login,
    balance: Credits,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(id: UserId, name: DisplayName, login: Login, balance: Credits) -> Self {
        Self {
            id,
            name,
            login,
            balance,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Sign-in handle.
    pub fn login(&self) -> &Login {
        &self.login
    }

    /// Latest committed balance.
    pub fn balance(&self) -> Credits {
        self.balance
    }
}
