//! Meal store port: multi-record owned collection.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Meal, MealDraft, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by meal store adapters.
    pub enum MealPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "meal store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "meal store query failed: {message}",
        /// No meal matched `(id, owner)` — either absent or owned by someone
        /// else; the two cases are deliberately indistinguishable.
        NotFound => "meal not found",
    }
}

/// Map meal store failures to domain errors.
pub fn map_meal_persistence_error(err: MealPersistenceError) -> Error {
    match err {
        MealPersistenceError::NotFound => Error::not_found("meal not found"),
        MealPersistenceError::Connection { message } | MealPersistenceError::Query { message } => {
            Error::internal(message)
        }
    }
}

/// Port for the meal collection.
///
/// Update and delete filter by `(id, owner)` in the store itself, so one
/// user can never mutate another's meal. Queries omitting the owner filter
/// are a correctness defect, not an optimisation.
#[async_trait]
pub trait MealRepository: Send + Sync {
    /// Persist a freshly minted meal.
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError>;

    /// All meals belonging to the owner, oldest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Meal>, MealPersistenceError>;

    /// Full-document replace of the meal matching `(id, owner)`.
    async fn replace(
        &self,
        owner: &UserId,
        id: Uuid,
        draft: &MealDraft,
    ) -> Result<Meal, MealPersistenceError>;

    /// Delete the meal matching `(id, owner)`.
    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<(), MealPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(MealPersistenceError::not_found(), ErrorCode::NotFound)]
    #[case(MealPersistenceError::connection("refused"), ErrorCode::InternalError)]
    #[case(MealPersistenceError::query("syntax"), ErrorCode::InternalError)]
    fn failures_map_to_expected_codes(
        #[case] err: MealPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_meal_persistence_error(err).code(), expected);
    }
}
