//! Transport-agnostic domain types, services, and ports.

mod auth;
mod error;
mod lists;
mod meal;
pub mod ports;
mod token;
mod user;

pub use auth::{AuthService, HASH_COST, Registration};
pub use error::{Error, ErrorCode};
pub use lists::{ListItem, ListItemDraft, ListKind, OwnedList};
pub use meal::{Ingredient, Macros, Meal, MealDraft, MealType};
pub use token::{TOKEN_TTL, TokenCodec};
pub use user::{DisplayName, Email, NAME_MAX, User, UserId};
