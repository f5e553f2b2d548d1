//! In-memory store implementations and request helpers for tests.
//!
//! Gated behind `cfg(test)` and the `test-support` feature so integration
//! tests can exercise the full HTTP surface without a database. The memory
//! stores mirror the Diesel adapters' observable semantics, including the
//! unchanged-length detection of item removal.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::App;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::test;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::ports::{
    ListPersistenceError, ListRepository, MealPersistenceError, MealRepository, NewUser,
    StoredUser, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthService, ListItem, ListKind, Meal, MealDraft, OwnedList, TokenCodec, User, UserId,
};
use crate::inbound::http::state::HttpState;

/// Low bcrypt cost so test registration stays fast.
pub const TEST_HASH_COST: u32 = 4;

const TEST_SECRET: &[u8] = b"test-support-signing-secret";

/// User store backed by a mutex-guarded map keyed on normalised email.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<String, StoredUser>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.users.lock().expect("user store poisoned");
        let key = new_user.email.as_str().to_owned();
        if users.contains_key(&key) {
            return Err(UserPersistenceError::duplicate_email());
        }
        let user = User::new(
            UserId::random(),
            new_user.email,
            new_user.name,
            Utc::now(),
        );
        users.insert(
            key,
            StoredUser {
                user: user.clone(),
                password_hash: new_user.password_hash,
            },
        );
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &crate::domain::Email,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let users = self.users.lock().expect("user store poisoned");
        Ok(users.get(email.as_str()).cloned())
    }
}

/// List store holding item sequences keyed on `(owner, kind)`.
#[derive(Default)]
pub struct MemoryListRepository {
    lists: Mutex<HashMap<(Uuid, ListKind), Vec<ListItem>>>,
}

#[async_trait]
impl ListRepository for MemoryListRepository {
    async fn get_or_create(
        &self,
        owner: &UserId,
        kind: ListKind,
    ) -> Result<OwnedList, ListPersistenceError> {
        let mut lists = self.lists.lock().expect("list store poisoned");
        let items = lists.entry((*owner.as_uuid(), kind)).or_default().clone();
        Ok(OwnedList {
            owner_id: *owner,
            kind,
            items,
        })
    }

    async fn append_items(
        &self,
        owner: &UserId,
        kind: ListKind,
        items: Vec<ListItem>,
    ) -> Result<OwnedList, ListPersistenceError> {
        let mut lists = self.lists.lock().expect("list store poisoned");
        let stored = lists.entry((*owner.as_uuid(), kind)).or_default();
        stored.extend(items);
        Ok(OwnedList {
            owner_id: *owner,
            kind,
            items: stored.clone(),
        })
    }

    async fn replace_items(
        &self,
        owner: &UserId,
        kind: ListKind,
        items: Vec<ListItem>,
    ) -> Result<OwnedList, ListPersistenceError> {
        let mut lists = self.lists.lock().expect("list store poisoned");
        lists.insert((*owner.as_uuid(), kind), items.clone());
        Ok(OwnedList {
            owner_id: *owner,
            kind,
            items,
        })
    }

    async fn remove_item(
        &self,
        owner: &UserId,
        kind: ListKind,
        item_id: Uuid,
    ) -> Result<(), ListPersistenceError> {
        let mut lists = self.lists.lock().expect("list store poisoned");
        let items = lists
            .get_mut(&(*owner.as_uuid(), kind))
            .ok_or_else(ListPersistenceError::list_not_found)?;
        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Err(ListPersistenceError::item_not_found());
        }
        Ok(())
    }
}

/// Meal store keeping records in insertion order, matching the oldest-first
/// ordering of the Diesel adapter.
#[derive(Default)]
pub struct MemoryMealRepository {
    meals: Mutex<Vec<Meal>>,
}

#[async_trait]
impl MealRepository for MemoryMealRepository {
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError> {
        let mut meals = self.meals.lock().expect("meal store poisoned");
        meals.push(meal.clone());
        Ok(())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Meal>, MealPersistenceError> {
        let meals = self.meals.lock().expect("meal store poisoned");
        Ok(meals
            .iter()
            .filter(|meal| meal.owner_id == *owner)
            .cloned()
            .collect())
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: Uuid,
        draft: &MealDraft,
    ) -> Result<Meal, MealPersistenceError> {
        let mut meals = self.meals.lock().expect("meal store poisoned");
        let meal = meals
            .iter_mut()
            .find(|meal| meal.id == id && meal.owner_id == *owner)
            .ok_or_else(MealPersistenceError::not_found)?;
        meal.name = draft.name.clone();
        meal.ingredients = draft.ingredients.clone();
        meal.instructions = draft.instructions.clone();
        meal.meal_type = draft.meal_type;
        meal.calories = draft.calories;
        meal.macros = draft.macros;
        Ok(meal.clone())
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<(), MealPersistenceError> {
        let mut meals = self.meals.lock().expect("meal store poisoned");
        let before = meals.len();
        meals.retain(|meal| !(meal.id == id && meal.owner_id == *owner));
        if meals.len() == before {
            return Err(MealPersistenceError::not_found());
        }
        Ok(())
    }
}

/// Handler state wired to fresh in-memory stores.
pub fn test_state() -> HttpState {
    let auth = AuthService::with_hash_cost(
        Arc::new(MemoryUserRepository::default()),
        TokenCodec::new(TEST_SECRET),
        TEST_HASH_COST,
    );
    HttpState::new(
        auth,
        Arc::new(MemoryListRepository::default()),
        Arc::new(MemoryMealRepository::default()),
    )
}

/// Mint a token the given state will accept.
pub fn test_token(state: &HttpState, user_id: &UserId) -> String {
    state.tokens().issue(user_id).expect("token issuance")
}

/// Full application over in-memory stores, for `test::init_service`.
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    crate::server::build_app(test_state())
}

/// Attach a bearer token to a test request.
pub fn authed(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

/// Register a fresh account and log in, returning the bearer token.
pub async fn register_and_login<S, B>(app: &S, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({
                "email": email,
                "password": "Passw0rd!",
                "name": "Planner",
            }))
            .to_request(),
    )
    .await;
    assert!(
        res.status().is_success(),
        "registration failed with {}",
        res.status()
    );

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": email, "password": "Passw0rd!"}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed with {}", res.status());
    let value: Value = test::read_body_json(res).await;
    value["token"].as_str().expect("token in body").to_owned()
}
