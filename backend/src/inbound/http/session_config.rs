//! Environment-driven session cookie settings.
//!
//! Debug builds fall back to development defaults with a warning; release
//! builds insist on explicit, valid values and a persisted key.

use std::path::PathBuf;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_DEFAULT_PATH: &str = "/run/secrets/citygrid_session_key";
/// Release builds reject shorter key files.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// `cookie::Key::derive_from` needs at least this much material.
const DERIVE_MIN_LEN: usize = 32;
/// Session cookie lifetime.
pub const SESSION_TTL_HOURS: i64 = 2;
/// Name of the session cookie.
pub const COOKIE_NAME: &str = "session";
const FINGERPRINT_BYTES: usize = 8;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Which validation regime applies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerate missing or invalid values.
    Debug,
    /// Require every value explicitly.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    ///
    /// ```rust
    /// use citygrid::inbound::http::session_config::BuildMode;
    ///
    /// let expected = if cfg!(debug_assertions) { BuildMode::Debug } else { BuildMode::Release };
    /// assert_eq!(BuildMode::from_debug_assertions(), expected);
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated session cookie settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Mark the cookie `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Short SHA-256 fingerprint of the signing key, safe to log.
    ///
    /// ```rust
    /// use actix_web::cookie::{Key, SameSite};
    /// use citygrid::inbound::http::session_config::SessionSettings;
    ///
    /// let settings = SessionSettings {
    ///     key: Key::generate(),
    ///     cookie_secure: true,
    ///     same_site: SameSite::Lax,
    /// };
    /// let fingerprint = settings.fingerprint();
    /// assert_eq!(fingerprint.len(), 16);
    /// assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.key.signing());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }

    /// Cookie session middleware: private (encrypted) content, `HttpOnly`,
    /// two-hour persistent lifetime.
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Session configuration failures.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read session settings from `env`.
///
/// ```rust
/// use citygrid::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
///
/// # Errors
///
/// In [`BuildMode::Release`], any missing or invalid value, an unreadable
/// or short key file, or an insecure `SameSite=None`.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_setting(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_setting(env, mode, cookie_secure)?;
    let allow_ephemeral = bool_setting(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = load_key(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// `fallback` with a warning in debug builds, `error` in release builds.
fn lenient<T>(mode: BuildMode, fallback: T, error: SessionConfigError) -> Result<T, SessionConfigError> {
    match mode {
        BuildMode::Debug => {
            warn!(%error, "session setting fell back to development default");
            Ok(fallback)
        }
        BuildMode::Release => Err(error),
    }
}

fn bool_setting<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    fallback: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return lenient(mode, fallback, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => lenient(
            mode,
            fallback,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn same_site_setting<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        return lenient(
            mode,
            SameSite::Lax,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
        );
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(mode, SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => lenient(
            mode,
            SameSite::Lax,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn load_key<E: Env>(env: &E, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using temporary session key (dev only)");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };

    let length = bytes.len();
    let key = if length >= SESSION_KEY_MIN_LEN {
        Ok(Key::derive_from(&bytes))
    } else if mode == BuildMode::Release {
        Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: SESSION_KEY_MIN_LEN,
        })
    } else if length >= DERIVE_MIN_LEN {
        warn!(path = %path.display(), length, "session key shorter than recommended");
        Ok(Key::derive_from(&bytes))
    } else {
        warn!(path = %path.display(), length, "session key unusable; using temporary key");
        Ok(Key::generate())
    };
    bytes.zeroize();
    key
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
