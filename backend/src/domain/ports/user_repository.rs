//! Credential store port: user persistence and lookup.

use async_trait::async_trait;

use crate::domain::{DisplayName, Email, Error, User};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by credential store adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
        /// A user with the same normalised email already exists.
        DuplicateEmail => "email already registered",
    }
}

/// Map credential store failures to domain errors.
///
/// `DuplicateEmail` is the one domain-meaningful outcome; infrastructure
/// failures collapse into an internal error so no storage detail leaks.
pub fn map_user_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateEmail => Error::conflict("email already registered"),
        UserPersistenceError::Connection { message } | UserPersistenceError::Query { message } => {
            Error::internal(message)
        }
    }
}

/// New identity record awaiting insertion. The password arrives pre-hashed;
/// the store never sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: DisplayName,
    pub password_hash: String,
}

/// Stored identity with its password hash, for credential verification only.
///
/// Handlers respond with the inner [`User`]; the hash must never be
/// serialised.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Port for the identity collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with [`UserPersistenceError::DuplicateEmail`]
    /// when a case-insensitive email match exists. Uniqueness is enforced at
    /// write time, so of two concurrent registrations only one succeeds.
    async fn create(&self, new_user: NewUser) -> Result<User, UserPersistenceError>;

    /// Case-insensitive lookup by normalised email.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<StoredUser>, UserPersistenceError>;
}
