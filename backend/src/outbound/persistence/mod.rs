//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations are thin translators between Diesel row
//! structs and domain types; no business logic lives here. Row models and
//! schema definitions stay private to this module.

mod diesel_list_repository;
mod diesel_meal_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_list_repository::DieselListRepository;
pub use diesel_meal_repository::DieselMealRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
