//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be tested against mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, BalanceCommand, BookingCommand, GridQuery, GridRepository,
    PasswordHasher, ProfileQuery, UserRepository,
};
use crate::domain::{AccountService, BalanceService, BookingService, GridQueryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub account_query: Arc<dyn AccountQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub balance: Arc<dyn BalanceCommand>,
    pub grid: Arc<dyn GridQuery>,
    pub profiles: Arc<dyn ProfileQuery>,
}

impl HttpState {
    /// Wire the domain services over a user store, a grid store and a
    /// password hasher.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use citygrid::inbound::http::state::HttpState;
    /// use citygrid::outbound::crypto::Argon2PasswordHasher;
    /// use citygrid::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::from_adapters(
    ///     Arc::clone(&store),
    ///     store,
    ///     Arc::new(Argon2PasswordHasher),
    /// );
    /// let _grid = state.grid.clone();
    /// ```
    pub fn from_adapters<R, G, H>(users: Arc<R>, grid: Arc<G>, hasher: Arc<H>) -> Self
    where
        R: UserRepository + 'static,
        G: GridRepository + 'static,
        H: PasswordHasher + 'static,
    {
        let accounts = Arc::new(AccountService::new(Arc::clone(&users), hasher));
        let views = Arc::new(GridQueryService::new(Arc::clone(&grid), Arc::clone(&users)));
        Self {
            accounts: accounts.clone(),
            account_query: accounts,
            bookings: Arc::new(BookingService::new(grid)),
            balance: Arc::new(BalanceService::new(users)),
            grid: views.clone(),
            profiles: views,
        }
    }
}
