//! PostgreSQL-backed `MealRepository` implementation.
//!
//! Update and delete filter by `(id, owner_id)` in the query itself; a
//! zero-row result means the meal is absent or foreign, and the two cases
//! are reported identically as `NotFound`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{MealPersistenceError, MealRepository};
use crate::domain::{Ingredient, Macros, Meal, MealDraft, MealType, UserId};

use super::models::{MealRow, MealUpdate, NewMealRow};
use super::pool::{DbPool, PoolError};
use super::schema::meals;

/// Diesel-backed implementation of the meal store port.
#[derive(Clone)]
pub struct DieselMealRepository {
    pool: DbPool,
}

impl DieselMealRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MealPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            MealPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> MealPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "meal query failed");
        }
        other => debug!(error = %other, "meal query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            MealPersistenceError::connection("database connection error")
        }
        _ => MealPersistenceError::query("database error"),
    }
}

fn encode_ingredients(
    ingredients: &[Ingredient],
) -> Result<serde_json::Value, MealPersistenceError> {
    serde_json::to_value(ingredients)
        .map_err(|_| MealPersistenceError::query("ingredients failed to encode"))
}

fn row_to_meal(row: MealRow) -> Result<Meal, MealPersistenceError> {
    let ingredients: Vec<Ingredient> = serde_json::from_value(row.ingredients)
        .map_err(|_| MealPersistenceError::query("stored ingredients failed to decode"))?;
    let meal_type: MealType = row
        .meal_type
        .parse()
        .map_err(|_| MealPersistenceError::query("unrecognised meal type in storage"))?;
    Ok(Meal {
        id: row.id,
        owner_id: UserId::from_uuid(row.owner_id),
        name: row.name,
        ingredients,
        instructions: row.instructions,
        meal_type,
        calories: row.calories,
        macros: Macros {
            protein: row.protein,
            carbs: row.carbs,
            fats: row.fats,
        },
        created_at: row.created_at,
    })
}

#[async_trait]
impl MealRepository for DieselMealRepository {
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ingredients = encode_ingredients(&meal.ingredients)?;
        let row = NewMealRow {
            id: meal.id,
            owner_id: *meal.owner_id.as_uuid(),
            name: &meal.name,
            ingredients: &ingredients,
            instructions: meal.instructions.as_deref(),
            meal_type: meal.meal_type.as_str(),
            calories: meal.calories,
            protein: meal.macros.protein,
            carbs: meal.macros.carbs,
            fats: meal.macros.fats,
            created_at: meal.created_at,
        };
        diesel::insert_into(meals::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Meal>, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MealRow> = meals::table
            .filter(meals::owner_id.eq(owner.as_uuid()))
            .order(meals::created_at.asc())
            .select(MealRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_meal).collect()
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: Uuid,
        draft: &MealDraft,
    ) -> Result<Meal, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ingredients = encode_ingredients(&draft.ingredients)?;
        let update = MealUpdate {
            name: &draft.name,
            ingredients: &ingredients,
            instructions: draft.instructions.as_deref(),
            meal_type: draft.meal_type.as_str(),
            calories: draft.calories,
            protein: draft.macros.protein,
            carbs: draft.macros.carbs,
            fats: draft.macros.fats,
        };
        let row: Option<MealRow> = diesel::update(
            meals::table
                .filter(meals::id.eq(id))
                .filter(meals::owner_id.eq(owner.as_uuid())),
        )
        .set(&update)
        .returning(MealRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        let row = row.ok_or_else(MealPersistenceError::not_found)?;
        row_to_meal(row)
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<(), MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            meals::table
                .filter(meals::id.eq(id))
                .filter(meals::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(MealPersistenceError::not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;

    fn row(meal_type: &str, ingredients: serde_json::Value) -> MealRow {
        MealRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Pancakes".to_owned(),
            ingredients,
            instructions: None,
            meal_type: meal_type.to_owned(),
            calories: 450.0,
            protein: 12.0,
            carbs: 60.0,
            fats: 14.0,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_rehydrate_into_domain_meals() {
        let meal = row_to_meal(row("breakfast", json!([{"name": "Flour", "quantity": 2}])))
            .expect("valid row");
        assert_eq!(meal.meal_type, MealType::Breakfast);
        assert_eq!(meal.ingredients[0].name, "Flour");
        assert_eq!(meal.macros.protein, 12.0);
    }

    #[rstest]
    fn unknown_stored_meal_type_is_a_query_error() {
        let err = row_to_meal(row("brunch", json!([]))).expect_err("rejected");
        assert!(matches!(err, MealPersistenceError::Query { .. }));
    }

    #[rstest]
    fn malformed_stored_ingredients_are_a_query_error() {
        let err = row_to_meal(row("dinner", json!("oops"))).expect_err("rejected");
        assert!(matches!(err, MealPersistenceError::Query { .. }));
    }
}
