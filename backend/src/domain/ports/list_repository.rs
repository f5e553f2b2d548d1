//! List store port: singleton grocery/pantry documents.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, ListItem, ListKind, OwnedList, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by list store adapters.
    pub enum ListPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "list store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "list store query failed: {message}",
        /// The owner has no list document of the requested kind.
        ListNotFound => "list not found",
        /// No item in the owner's list matched the identifier.
        ItemNotFound => "item not found",
    }
}

/// Map list store failures to domain errors. Both missing-list and
/// missing-item outcomes surface as 404s.
pub fn map_list_persistence_error(err: ListPersistenceError) -> Error {
    match err {
        ListPersistenceError::ListNotFound => Error::not_found("list not found"),
        ListPersistenceError::ItemNotFound => Error::not_found("item not found"),
        ListPersistenceError::Connection { message } | ListPersistenceError::Query { message } => {
            Error::internal(message)
        }
    }
}

/// Port for singleton list documents, one implementation serving both kinds.
///
/// Every operation is scoped by `(owner, kind)`; a caller can never observe
/// or mutate another user's list. Mutations are single-document
/// read-modify-write with last-writer-wins semantics.
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// Fetch the owner's list, creating an empty document on first access.
    async fn get_or_create(
        &self,
        owner: &UserId,
        kind: ListKind,
    ) -> Result<OwnedList, ListPersistenceError>;

    /// Append validated items to the owner's list, creating it if absent.
    async fn append_items(
        &self,
        owner: &UserId,
        kind: ListKind,
        items: Vec<ListItem>,
    ) -> Result<OwnedList, ListPersistenceError>;

    /// Replace the owner's list contents wholesale. An empty `items` clears
    /// the list.
    async fn replace_items(
        &self,
        owner: &UserId,
        kind: ListKind,
        items: Vec<ListItem>,
    ) -> Result<OwnedList, ListPersistenceError>;

    /// Remove one item by id. Fails with `ListNotFound` when the owner has no
    /// document and `ItemNotFound` when nothing matched (unchanged length is
    /// the detection signal).
    async fn remove_item(
        &self,
        owner: &UserId,
        kind: ListKind,
        item_id: Uuid,
    ) -> Result<(), ListPersistenceError>;
}
