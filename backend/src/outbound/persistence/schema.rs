//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the migrations exactly; regenerate with
//! `diesel print-schema` after a migration changes the layout.

diesel::table! {
    /// Registered users. Emails are stored pre-normalised so the unique
    /// index enforces case-insensitive uniqueness.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Singleton list documents, at most one row per `(owner_id, kind)`.
    owned_lists (id) {
        id -> Uuid,
        owner_id -> Uuid,
        kind -> Varchar,
        items -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Meal records, one row per meal.
    meals (id) {
        id -> Uuid,
        owner_id -> Uuid,
        name -> Varchar,
        ingredients -> Jsonb,
        instructions -> Nullable<Text>,
        meal_type -> Varchar,
        calories -> Float8,
        protein -> Float8,
        carbs -> Float8,
        fats -> Float8,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, owned_lists, meals);
