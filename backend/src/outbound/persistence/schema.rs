//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When a migration
//! changes the schema, regenerate them with `diesel print-schema`.

diesel::table! {
    /// Registered accounts.
    ///
    /// `login` carries a unique constraint; `balance` is checked non-negative.
    users (id) {
        id -> Int4,
        name -> Varchar,
        login -> Varchar,
        password_hash -> Text,
        balance -> Int8,
    }
}

diesel::table! {
    /// The fixed grid of rentable cells.
    ///
    /// `user_id` and `building_type` are either both null or both set.
    cells (id) {
        id -> Int4,
        user_id -> Nullable<Int4>,
        building_type -> Nullable<Int2>,
    }
}

diesel::joinable!(cells -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(cells, users);
