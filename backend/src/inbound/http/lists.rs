//! Grocery and pantry list handlers.
//!
//! Both resources share one owned-collection implementation parameterised by
//! [`ListKind`]; the route-level functions are thin wrappers that pin the
//! kind and the path prefix. Item-level delete takes the item id as the
//! `itemId` query parameter.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::map_list_persistence_error;
use crate::domain::{Error, ListItem, ListItemDraft, ListKind, OwnedList};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::require_field;

/// Item as submitted by a client. The id is honoured only on full replace.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ListItemPayload {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub quantity: Option<u32>,
}

impl From<ListItemPayload> for ListItemDraft {
    fn from(payload: ListItemPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name,
            quantity: payload.quantity,
        }
    }
}

/// Request body for append (`POST`) and replace (`PUT`).
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ListRequest {
    pub items: Option<Vec<ListItemPayload>>,
}

/// Query parameters for item-level delete.
#[derive(Debug, Deserialize)]
pub struct RemoveItemQuery {
    #[serde(rename = "itemId")]
    pub item_id: Option<Uuid>,
}

/// Stored item returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListItemResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
}

/// List document returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub owner_id: String,
    #[schema(example = "grocery")]
    pub kind: String,
    pub items: Vec<ListItemResponse>,
}

impl From<OwnedList> for ListResponse {
    fn from(list: OwnedList) -> Self {
        Self {
            owner_id: list.owner_id.to_string(),
            kind: list.kind.to_string(),
            items: list
                .items
                .into_iter()
                .map(|item| ListItemResponse {
                    id: item.id,
                    name: item.name,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

async fn fetch_list(
    state: web::Data<HttpState>,
    identity: Identity,
    kind: ListKind,
) -> ApiResult<HttpResponse> {
    let list = state
        .lists
        .get_or_create(identity.user_id(), kind)
        .await
        .map_err(map_list_persistence_error)?;
    Ok(HttpResponse::Ok().json(ListResponse::from(list)))
}

fn empty_items_error() -> Error {
    Error::invalid_request("items must be a non-empty sequence")
        .with_details(json!({"field": "items"}))
}

async fn append_to_list(
    state: web::Data<HttpState>,
    identity: Identity,
    kind: ListKind,
    payload: ListRequest,
) -> ApiResult<HttpResponse> {
    let items = require_field(payload.items, "items")?;
    if items.is_empty() {
        return Err(empty_items_error());
    }
    let items: Vec<ListItem> = items
        .into_iter()
        .map(|item| ListItemDraft::from(item).into_new_item())
        .collect::<Result<_, _>>()?;
    let list = state
        .lists
        .append_items(identity.user_id(), kind, items)
        .await
        .map_err(map_list_persistence_error)?;
    Ok(HttpResponse::Ok().json(ListResponse::from(list)))
}

async fn replace_list(
    state: web::Data<HttpState>,
    identity: Identity,
    kind: ListKind,
    payload: ListRequest,
) -> ApiResult<HttpResponse> {
    // An empty sequence is a deliberate clear; only a missing field fails.
    let items = require_field(payload.items, "items")?;
    let items: Vec<ListItem> = items
        .into_iter()
        .map(|item| ListItemDraft::from(item).into_replacement_item())
        .collect::<Result<_, _>>()?;
    let list = state
        .lists
        .replace_items(identity.user_id(), kind, items)
        .await
        .map_err(map_list_persistence_error)?;
    Ok(HttpResponse::Ok().json(ListResponse::from(list)))
}

async fn remove_from_list(
    state: web::Data<HttpState>,
    identity: Identity,
    kind: ListKind,
    query: RemoveItemQuery,
) -> ApiResult<HttpResponse> {
    let item_id = require_field(query.item_id, "itemId")?;
    state
        .lists
        .remove_item(identity.user_id(), kind, item_id)
        .await
        .map_err(map_list_persistence_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Fetch the grocery list, creating an empty one on first access.
#[utoipa::path(
    get,
    path = "/api/v1/grocery-list",
    responses(
        (status = 200, description = "Grocery list", body = ListResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["lists"],
    operation_id = "getGroceryList"
)]
#[get("/grocery-list")]
pub async fn get_grocery_list(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<HttpResponse> {
    fetch_list(state, identity, ListKind::Grocery).await
}

/// Append items to the grocery list.
#[utoipa::path(
    post,
    path = "/api/v1/grocery-list",
    request_body = ListRequest,
    responses(
        (status = 200, description = "Updated grocery list", body = ListResponse),
        (status = 400, description = "Missing or empty items"),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["lists"],
    operation_id = "appendGroceryItems"
)]
#[post("/grocery-list")]
pub async fn append_grocery_items(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<ListRequest>,
) -> ApiResult<HttpResponse> {
    append_to_list(state, identity, ListKind::Grocery, payload.into_inner()).await
}

/// Replace the grocery list contents.
#[utoipa::path(
    put,
    path = "/api/v1/grocery-list",
    request_body = ListRequest,
    responses(
        (status = 200, description = "Replaced grocery list", body = ListResponse),
        (status = 400, description = "Missing items field"),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["lists"],
    operation_id = "replaceGroceryItems"
)]
#[put("/grocery-list")]
pub async fn replace_grocery_items(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<ListRequest>,
) -> ApiResult<HttpResponse> {
    replace_list(state, identity, ListKind::Grocery, payload.into_inner()).await
}

/// Remove one grocery item by `itemId`.
#[utoipa::path(
    delete,
    path = "/api/v1/grocery-list",
    params(("itemId" = String, Query, description = "Identifier of the item to remove")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "List or item not found")
    ),
    tags = ["lists"],
    operation_id = "removeGroceryItem"
)]
#[delete("/grocery-list")]
pub async fn remove_grocery_item(
    state: web::Data<HttpState>,
    identity: Identity,
    query: web::Query<RemoveItemQuery>,
) -> ApiResult<HttpResponse> {
    remove_from_list(state, identity, ListKind::Grocery, query.into_inner()).await
}

/// Fetch the pantry list, creating an empty one on first access.
#[utoipa::path(
    get,
    path = "/api/v1/pantry-list",
    responses(
        (status = 200, description = "Pantry list", body = ListResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["lists"],
    operation_id = "getPantryList"
)]
#[get("/pantry-list")]
pub async fn get_pantry_list(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<HttpResponse> {
    fetch_list(state, identity, ListKind::Pantry).await
}

/// Append items to the pantry list.
#[utoipa::path(
    post,
    path = "/api/v1/pantry-list",
    request_body = ListRequest,
    responses(
        (status = 200, description = "Updated pantry list", body = ListResponse),
        (status = 400, description = "Missing or empty items"),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["lists"],
    operation_id = "appendPantryItems"
)]
#[post("/pantry-list")]
pub async fn append_pantry_items(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<ListRequest>,
) -> ApiResult<HttpResponse> {
    append_to_list(state, identity, ListKind::Pantry, payload.into_inner()).await
}

/// Replace the pantry list contents.
#[utoipa::path(
    put,
    path = "/api/v1/pantry-list",
    request_body = ListRequest,
    responses(
        (status = 200, description = "Replaced pantry list", body = ListResponse),
        (status = 400, description = "Missing items field"),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["lists"],
    operation_id = "replacePantryItems"
)]
#[put("/pantry-list")]
pub async fn replace_pantry_items(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<ListRequest>,
) -> ApiResult<HttpResponse> {
    replace_list(state, identity, ListKind::Pantry, payload.into_inner()).await
}

/// Remove one pantry item by `itemId`.
#[utoipa::path(
    delete,
    path = "/api/v1/pantry-list",
    params(("itemId" = String, Query, description = "Identifier of the item to remove")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "List or item not found")
    ),
    tags = ["lists"],
    operation_id = "removePantryItem"
)]
#[delete("/pantry-list")]
pub async fn remove_pantry_item(
    state: web::Data<HttpState>,
    identity: Identity,
    query: web::Query<RemoveItemQuery>,
) -> ApiResult<HttpResponse> {
    remove_from_list(state, identity, ListKind::Pantry, query.into_inner()).await
}
