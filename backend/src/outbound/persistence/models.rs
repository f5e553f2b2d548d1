//! Internal Diesel row structs.
//!
//! Implementation details of the persistence layer, never exposed to the
//! domain. Conversion to domain types lives in the repository adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{meals, owned_lists, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the owned_lists table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = owned_lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListRow {
    #[expect(dead_code, reason = "surrogate key, addressing is by (owner, kind)")]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: String,
    pub items: serde_json::Value,
    #[expect(dead_code, reason = "audit column not surfaced in responses")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new list documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = owned_lists)]
pub(crate) struct NewListRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: &'a str,
    pub items: &'a serde_json::Value,
}

/// Row struct for reading from the meals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = meals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MealRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub ingredients: serde_json::Value,
    pub instructions: Option<String>,
    pub meal_type: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new meal records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = meals)]
pub(crate) struct NewMealRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub ingredients: &'a serde_json::Value,
    pub instructions: Option<&'a str>,
    pub meal_type: &'a str,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub created_at: DateTime<Utc>,
}

/// Changeset for full-document meal replacement. `treat_none_as_null` makes
/// an omitted `instructions` clear the stored value rather than keep it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = meals)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MealUpdate<'a> {
    pub name: &'a str,
    pub ingredients: &'a serde_json::Value,
    pub instructions: Option<&'a str>,
    pub meal_type: &'a str,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}
