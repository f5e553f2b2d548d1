//! Authentication use-cases: credential issuance and login.
//!
//! `AuthService` owns the security-sensitive decisions: how passwords are
//! hashed, that login failures never reveal whether the email or the
//! password was wrong, and that tokens are only minted after a successful
//! hash comparison. Storage is reached through the [`UserRepository`] port,
//! so handler tests can substitute an in-memory double.

use std::sync::Arc;

use tracing::debug;

use super::ports::{NewUser, UserRepository, map_user_persistence_error};
use super::token::TokenCodec;
use super::{DisplayName, Email, Error, User};

/// bcrypt work factor for stored credentials.
pub const HASH_COST: u32 = 10;

/// Registration input after transport-level presence checks.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Domain service handling registration and login.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenCodec,
    hash_cost: u32,
}

impl AuthService {
    /// Build a service with the production bcrypt cost.
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenCodec) -> Self {
        Self {
            users,
            tokens,
            hash_cost: HASH_COST,
        }
    }

    /// Build a service with a reduced bcrypt cost for fast tests.
    #[cfg(any(test, feature = "test-support"))]
    pub fn with_hash_cost(users: Arc<dyn UserRepository>, tokens: TokenCodec, cost: u32) -> Self {
        Self {
            users,
            tokens,
            hash_cost: cost,
        }
    }

    /// Token codec shared with the request extractor.
    pub const fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Register a new user.
    ///
    /// Validates email shape and name, hashes the password with a salted
    /// slow hash, and delegates persistence to the credential store. The
    /// returned [`User`] carries no credential material.
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration {
            email,
            password,
            name,
        } = registration;

        let email = Email::try_new(email)?;
        let name = DisplayName::try_new(name)?;
        if password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }

        let password_hash = hash_password(password, self.hash_cost).await?;
        self.users
            .create(NewUser {
                email,
                name,
                password_hash,
            })
            .await
            .map_err(map_user_persistence_error)
    }

    /// Verify credentials and mint a session token.
    ///
    /// Unknown email, malformed email, and wrong password all produce the
    /// identical `Unauthorized` error so the response leaks nothing about
    /// which part failed. The hash comparison is bcrypt's built-in
    /// constant-time verify.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, Error> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::invalid_request("email and password are required"));
        }

        // A malformed email can never match a stored (validated) one.
        let Ok(email) = Email::try_new(email) else {
            return Err(invalid_credentials());
        };

        let stored = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?;

        let Some(stored) = stored else {
            debug!(email = %email, "login attempt for unknown email");
            return Err(invalid_credentials());
        };

        let matches = verify_password(password.to_owned(), stored.password_hash).await?;
        if !matches {
            debug!(user_id = %stored.user.id(), "login attempt with wrong password");
            return Err(invalid_credentials());
        }

        self.tokens.issue(stored.user.id())
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// bcrypt is CPU-bound at cost 10, so hashing runs on the blocking pool.
async fn hash_password(password: String, cost: u32) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

async fn verify_password(password: String, hash: String) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
        .map_err(|err| Error::internal(format!("password verification failed: {err}")))
}
