//! PostgreSQL-backed `ListRepository` implementation.
//!
//! Each `(owner, kind)` pair maps to one row whose items live in a JSONB
//! column, so every mutation is a single-row read-modify-write with
//! last-writer-wins semantics. First access inserts the empty document via
//! `ON CONFLICT DO NOTHING`, which also makes concurrent first accesses
//! converge on one row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ListPersistenceError, ListRepository};
use crate::domain::{ListItem, ListKind, OwnedList, UserId};

use super::models::{ListRow, NewListRow};
use super::pool::{DbPool, PoolError};
use super::schema::owned_lists;

/// Diesel-backed implementation of the list store port.
#[derive(Clone)]
pub struct DieselListRepository {
    pool: DbPool,
}

impl DieselListRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ListPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ListPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ListPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "list query failed");
        }
        other => debug!(error = %other, "list query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ListPersistenceError::connection("database connection error")
        }
        _ => ListPersistenceError::query("database error"),
    }
}

fn decode_items(value: serde_json::Value) -> Result<Vec<ListItem>, ListPersistenceError> {
    serde_json::from_value(value)
        .map_err(|_| ListPersistenceError::query("stored list items failed to decode"))
}

fn encode_items(items: &[ListItem]) -> Result<serde_json::Value, ListPersistenceError> {
    serde_json::to_value(items)
        .map_err(|_| ListPersistenceError::query("list items failed to encode"))
}

fn row_to_list(row: ListRow) -> Result<OwnedList, ListPersistenceError> {
    let kind = ListKind::from_storage(&row.kind)
        .ok_or_else(|| ListPersistenceError::query("unrecognised list kind in storage"))?;
    Ok(OwnedList {
        owner_id: UserId::from_uuid(row.owner_id),
        kind,
        items: decode_items(row.items)?,
    })
}

/// Insert the empty document unless one already exists, then read it back.
async fn ensure_row(
    conn: &mut AsyncPgConnection,
    owner: &UserId,
    kind: ListKind,
) -> Result<ListRow, ListPersistenceError> {
    let empty = serde_json::Value::Array(Vec::new());
    let new_row = NewListRow {
        id: Uuid::new_v4(),
        owner_id: *owner.as_uuid(),
        kind: kind.as_str(),
        items: &empty,
    };
    diesel::insert_into(owned_lists::table)
        .values(&new_row)
        .on_conflict((owned_lists::owner_id, owned_lists::kind))
        .do_nothing()
        .execute(conn)
        .await
        .map_err(map_diesel_error)?;

    owned_lists::table
        .filter(owned_lists::owner_id.eq(owner.as_uuid()))
        .filter(owned_lists::kind.eq(kind.as_str()))
        .select(ListRow::as_select())
        .first(conn)
        .await
        .map_err(map_diesel_error)
}

/// Persist the new item sequence and return the updated document.
async fn write_items(
    conn: &mut AsyncPgConnection,
    owner: &UserId,
    kind: ListKind,
    items: Vec<ListItem>,
) -> Result<OwnedList, ListPersistenceError> {
    let encoded = encode_items(&items)?;
    diesel::update(
        owned_lists::table
            .filter(owned_lists::owner_id.eq(owner.as_uuid()))
            .filter(owned_lists::kind.eq(kind.as_str())),
    )
    .set((
        owned_lists::items.eq(&encoded),
        owned_lists::updated_at.eq(diesel::dsl::now),
    ))
    .execute(conn)
    .await
    .map_err(map_diesel_error)?;

    Ok(OwnedList {
        owner_id: *owner,
        kind,
        items,
    })
}

#[async_trait]
impl ListRepository for DieselListRepository {
    async fn get_or_create(
        &self,
        owner: &UserId,
        kind: ListKind,
    ) -> Result<OwnedList, ListPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ensure_row(&mut conn, owner, kind).await?;
        row_to_list(row)
    }

    async fn append_items(
        &self,
        owner: &UserId,
        kind: ListKind,
        items: Vec<ListItem>,
    ) -> Result<OwnedList, ListPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ensure_row(&mut conn, owner, kind).await?;
        let mut stored = decode_items(row.items)?;
        stored.extend(items);
        write_items(&mut conn, owner, kind, stored).await
    }

    async fn replace_items(
        &self,
        owner: &UserId,
        kind: ListKind,
        items: Vec<ListItem>,
    ) -> Result<OwnedList, ListPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        ensure_row(&mut conn, owner, kind).await?;
        write_items(&mut conn, owner, kind, items).await
    }

    async fn remove_item(
        &self,
        owner: &UserId,
        kind: ListKind,
        item_id: Uuid,
    ) -> Result<(), ListPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ListRow> = owned_lists::table
            .filter(owned_lists::owner_id.eq(owner.as_uuid()))
            .filter(owned_lists::kind.eq(kind.as_str()))
            .select(ListRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let row = row.ok_or_else(ListPersistenceError::list_not_found)?;
        let stored = decode_items(row.items)?;
        let before = stored.len();
        let remaining: Vec<ListItem> =
            stored.into_iter().filter(|item| item.id != item_id).collect();
        if remaining.len() == before {
            return Err(ListPersistenceError::item_not_found());
        }

        write_items(&mut conn, owner, kind, remaining).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn stored_items_decode_and_re_encode() {
        let id = Uuid::new_v4();
        let stored = json!([{"id": id, "name": "Flour", "quantity": 2}]);
        let items = decode_items(stored).expect("decodes");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Flour");
        let encoded = encode_items(&items).expect("encodes");
        assert_eq!(encoded[0]["id"], json!(id));
    }

    #[rstest]
    fn malformed_stored_items_surface_as_query_errors() {
        let err = decode_items(json!({"not": "an array"})).expect_err("rejected");
        assert!(matches!(err, ListPersistenceError::Query { .. }));
    }

    #[rstest]
    fn unknown_kind_in_storage_is_a_query_error() {
        let row = ListRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            kind: "wishlist".to_owned(),
            items: json!([]),
            updated_at: chrono::Utc::now(),
        };
        let err = row_to_list(row).expect_err("rejected");
        assert!(matches!(err, ListPersistenceError::Query { .. }));
    }
}
