//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Every test gets its own database cloned from a template that already has
//! the grid migration applied, so suites can mutate freely and run in
//! parallel. When the cluster cannot start the test fails, unless
//! `SKIP_TEST_CLUSTER` is truthy, in which case it is skipped.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;

/// Schema and 100-cell seed, applied once to the template database.
const CREATE_GRID: &str = include_str!("../../migrations/2026-01-01-000000_create_grid/up.sql");

const TEMPLATE_NAME_PREFIX: &str = "citygrid_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Render a `postgres` error with its SQLSTATE and message.
///
/// `Display` on `postgres::Error` collapses server errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Run a batch of SQL statements against `url`.
pub fn execute_batch(url: &str, sql: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(sql)
        .map_err(|err| format_postgres_error(&err))
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Create the migrated template unless an identical one already exists.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        execute_batch(&url, CREATE_GRID).map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(template_name)
}

fn provision_attempt(cluster: &ClusterHandle, attempt: usize) -> Result<TemporaryDatabase, String> {
    let template_name = ensure_template_database(cluster)
        .map_err(|err| format!("attempt {attempt}/{PROVISION_RETRIES}: {err}"))?;
    let db_name = format!("test_{}", Uuid::new_v4());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|err| {
            format!("create database from template: attempt {attempt}/{PROVISION_RETRIES}: {err:?}")
        })
}

/// Keep `PG_PASSWORD` stable across test binaries that reuse one data
/// directory; the embedded settings otherwise pick a fresh random password
/// that no longer matches the initialised cluster.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster spawns any threads, and the shared
        // handle serialises bootstrap so this executes at most once per
        // process.
        unsafe {
            std::env::set_var("PG_PASSWORD", "citygrid_embedded_test");
        }
    }
}

/// Provision a fresh, migrated database on the shared embedded cluster.
pub fn provision_database() -> Result<TemporaryDatabase, String> {
    ensure_stable_password();
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;

    let mut last_error = String::from("create database from template: exhausted retries");
    for attempt in 1..=PROVISION_RETRIES {
        match provision_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(err) => last_error = err,
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when allowed, otherwise fail loudly so CI breakage is
/// not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
