//! Domain ports: traits the inbound adapters drive and the outbound
//! adapters implement, plus their error enums.

mod list_repository;
mod macros;
mod meal_repository;
mod user_repository;

pub use list_repository::{ListPersistenceError, ListRepository, map_list_persistence_error};
pub use meal_repository::{MealPersistenceError, MealRepository, map_meal_persistence_error};
pub use user_repository::{
    NewUser, StoredUser, UserPersistenceError, UserRepository, map_user_persistence_error,
};
