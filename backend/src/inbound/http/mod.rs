//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod lists;
pub mod meals;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;
