//! PostgreSQL-backed `UserRepository` implementation.
//!
//! Duplicate registration is detected at write time: the unique index on the
//! pre-normalised email column turns the losing insert of a race into a
//! `DuplicateEmail` failure.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{NewUser, StoredUser, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, Email, User, UserId};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the credential store port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "user query failed");
        }
        other => debug!(error = %other, "user query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::duplicate_email()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Rehydrate a stored row into domain types.
///
/// Stored values already passed validation on the way in, so a failure here
/// means the table was mutated outside the application.
fn row_to_stored_user(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let email = Email::try_new(&row.email)
        .map_err(|_| UserPersistenceError::query("stored email failed validation"))?;
    let name = DisplayName::try_new(row.name)
        .map_err(|_| UserPersistenceError::query("stored name failed validation"))?;
    Ok(StoredUser {
        user: User::new(UserId::from_uuid(row.id), email, name, row.created_at),
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: *UserId::random().as_uuid(),
            email: new_user.email.as_str(),
            name: new_user.name.as_str(),
            password_hash: &new_user.password_hash,
        };

        let inserted: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_stored_user(inserted)?.user)
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_stored_user).transpose()
    }
}
