//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Top-ups are a single `UPDATE … RETURNING` statement, so concurrent credits
//! never lose an increment.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{Credits, DisplayName, Login, PasswordHash, User, UserId};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use citygrid::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/citygrid")).await?;
    /// let repository = DieselUserRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<(User, PasswordHash), UserPersistenceError> {
    let corrupt = |err: crate::domain::UserValidationError| {
        warn!(user_id = row.id, error = %err, "invalid user row");
        UserPersistenceError::query("invalid user row")
    };
    let id = UserId::new(row.id).map_err(corrupt)?;
    let name = DisplayName::new(&row.name).map_err(corrupt)?;
    let login = Login::new(&row.login).map_err(corrupt)?;
    let user = User::new(id, name, login, Credits::new(row.balance));
    Ok((user, PasswordHash::new(row.password_hash)))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            name: user.name.as_str(),
            login: user.login.as_str(),
            password_hash: user.password_hash.as_str(),
            balance: user.balance.get(),
        };

        let id: i32 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_login(user.login.as_str())
                } else {
                    diesel_error(err)
                }
            })?;

        UserId::new(id).map_err(|err| UserPersistenceError::query(err.to_string()))
    }

    async fn find_credentials(
        &self,
        login: &Login,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::login.eq(login.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_user)
            .transpose()
            .map(|found| found.map(|(user, password_hash)| StoredCredentials { user, password_hash }))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(|row| row_to_user(row).map(|(user, _)| user))
            .transpose()
    }

    async fn credit(
        &self,
        id: UserId,
        amount: Credits,
    ) -> Result<Option<Credits>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let balance: Option<i64> = diesel::update(users::table.find(id.get()))
            .set(users::balance.eq(users::balance + amount.get()))
            .returning(users::balance)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(balance.map(Credits::new))
    }
}
