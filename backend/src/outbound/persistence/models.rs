//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;

use super::schema::{cells, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub login: String,
    pub password_hash: String,
    pub balance: i64,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub login: &'a str,
    pub password_hash: &'a str,
    pub balance: i64,
}

/// Row struct for reading from the cells table.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = cells)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CellRow {
    pub id: i32,
    pub user_id: Option<i32>,
    pub building_type: Option<i16>,
}

/// Insertable struct for seeding empty cells.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = cells)]
pub(crate) struct NewCellRow {
    pub id: i32,
}
