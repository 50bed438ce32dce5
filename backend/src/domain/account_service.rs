//! Account use-cases: registration, sign-in and account lookups.
//!
//! Passwords are hashed through the [`PasswordHasher`] port before they reach
//! the store, and sign-in failures never reveal whether the login exists.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use super::persistence_errors::map_user_persistence_error;
use super::ports::{AccountCommand, AccountQuery, NewUser, PasswordHasher, UserRepository};
use super::{
    AuthenticatedUser, Error, Login, LoginCredentials, Registration, STARTING_BALANCE, User,
    UserId,
};

/// Message shown for any failed sign-in.
pub(crate) const INVALID_CREDENTIALS: &str = "Invalid login or password.";

/// Account service backed by a user repository and a password hasher.
#[derive(Clone)]
pub struct AccountService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountService<R, H> {
    /// Create a service over the given adapters.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<R, H> AccountCommand for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing failed");
                Error::internal("Something went wrong. Try again.")
            })?;
        let new_user = NewUser {
            name: registration.name().clone(),
            login: registration.login().clone(),
            password_hash,
            balance: STARTING_BALANCE,
        };

        let id = match self.users.create(&new_user).await {
            Ok(id) => id,
            Err(err) => {
                debug!(login = %new_user.login, error = %err, "registration rejected");
                return Err(map_user_persistence_error(err));
            }
        };

        info!(user_id = %id, login = %new_user.login, "account registered");
        let NewUser {
            name,
            login,
            balance,
            ..
        } = new_user;
        Ok(User::new(id, name, login, balance))
    }

    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        let Ok(login) = Login::new(credentials.login()) else {
            debug!("sign-in with malformed login");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        };
        let stored = self
            .users
            .find_credentials(&login)
            .await
            .map_err(map_user_persistence_error)?;
        let Some(stored) = stored else {
            debug!(login = %login, "sign-in for unknown login");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        };
        if !self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
        {
            debug!(user_id = %stored.user.id(), "sign-in with wrong password");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }

        info!(user_id = %stored.user.id(), "signed in");
        Ok(stored.user.into())
    }
}

#[async_trait]
impl<R, H> AccountQuery for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn find_user(&self, id: UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockPasswordHasher, MockUserRepository, PasswordHasherError, StoredCredentials,
        UserPersistenceError,
    };
    use crate::domain::{Credits, DisplayName, ErrorCode, PasswordHash};
    use rstest::{fixture, rstest};

    fn user(id: i32) -> User {
        User::new(
            UserId::new(id).expect("valid id"),
            DisplayName::new("Alice").expect("valid name"),
            Login::new("alice").expect("valid login"),
            Credits::new(900),
        )
    }

    #[fixture]
    fn registration() -> Registration {
        Registration::try_from_parts("Alice", "alice", "pw", "pw").expect("valid registration")
    }

    fn hashing_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));
        hasher
    }

    fn service(
        users: MockUserRepository,
        hasher: MockPasswordHasher,
    ) -> AccountService<MockUserRepository, MockPasswordHasher> {
        AccountService::new(Arc::new(users), Arc::new(hasher))
    }

    #[rstest]
    #[tokio::test]
    async fn register_stores_hash_and_starting_balance(registration: Registration) {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|new_user| {
                new_user.password_hash.as_str() == "hashed:pw"
                    && new_user.balance == STARTING_BALANCE
                    && new_user.login.as_str() == "alice"
            })
            .times(1)
            .returning(|_| Ok(UserId::new(4).expect("valid id")));

        let created = service(users, hashing_hasher())
            .register(&registration)
            .await
            .expect("registration succeeds");

        assert_eq!(created.id().get(), 4);
        assert_eq!(created.balance(), Credits::new(1000));
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_duplicate_login_to_conflict(registration: Registration) {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .returning(|_| Err(UserPersistenceError::duplicate_login("alice")));

        let err = service(users, hashing_hasher())
            .register(&registration)
            .await
            .expect_err("duplicate login");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn register_does_not_store_when_hashing_fails(registration: Registration) {
        let mut users = MockUserRepository::new();
        users.expect_create().never();
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(PasswordHasherError::hashing("bad params")));

        let err = service(users, hasher)
            .register(&registration)
            .await
            .expect_err("hashing failure");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::InvalidCredentials))]
    #[tokio::test]
    async fn authenticate_checks_password(
        #[case] matches: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(|_| {
            Ok(Some(StoredCredentials {
                user: user(1),
                password_hash: PasswordHash::new("stored"),
            }))
        });
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().return_const(matches);

        let credentials = LoginCredentials::try_from_parts("alice", "pw").expect("valid creds");
        let result = service(users, hasher).authenticate(&credentials).await;

        match expected {
            None => {
                let identity = result.expect("sign-in succeeds");
                assert_eq!(identity.id.get(), 1);
                assert_eq!(identity.balance, Credits::new(900));
            }
            Some(code) => assert_eq!(result.expect_err("sign-in fails").code(), code),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_unknown_login_matches_wrong_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(|_| Ok(None));
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().never();

        let credentials = LoginCredentials::try_from_parts("nobody", "pw").expect("valid creds");
        let err = service(users, hasher)
            .authenticate(&credentials)
            .await
            .expect_err("unknown login");

        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
        assert_eq!(err.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn find_user_surfaces_outage() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Err(UserPersistenceError::connection("refused")));

        let err = service(users, MockPasswordHasher::new())
            .find_user(UserId::new(1).expect("valid id"))
            .await
            .expect_err("outage");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
