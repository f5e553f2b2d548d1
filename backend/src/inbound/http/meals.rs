//! Meal collection handlers.
//!
//! Unlike the lists, meals are a multi-record collection addressed by id.
//! Update and delete resolve `(id, owner)` in the store, so a foreign or
//! absent meal is a plain 404 either way.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::map_meal_persistence_error;
use crate::domain::{Error, Ingredient, Macros, Meal, MealDraft, MealType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Identity;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::require_field;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct IngredientPayload {
    pub name: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MacrosPayload {
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

/// Request body for create and full-document update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MealPayload {
    pub name: Option<String>,
    pub ingredients: Option<Vec<IngredientPayload>>,
    pub instructions: Option<String>,
    #[serde(rename = "mealType")]
    pub meal_type: Option<String>,
    pub calories: Option<f64>,
    pub macros: Option<MacrosPayload>,
}

impl MealPayload {
    /// Validate the payload into a domain draft, reporting the first missing
    /// or malformed field.
    fn into_draft(self) -> Result<MealDraft, Error> {
        let name = require_field(self.name, "name")?;
        let ingredients = require_field(self.ingredients, "ingredients")?
            .into_iter()
            .map(IngredientPayload::into_ingredient)
            .collect::<Result<Vec<_>, _>>()?;
        let meal_type = MealType::from_str(&require_field(self.meal_type, "mealType")?)?;
        let calories = require_field(self.calories, "calories")?;
        let macros = require_field(self.macros, "macros")?.into_macros()?;
        MealDraft::try_new(
            name,
            ingredients,
            self.instructions,
            meal_type,
            calories,
            macros,
        )
    }
}

impl IngredientPayload {
    fn into_ingredient(self) -> Result<Ingredient, Error> {
        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            return Err(
                Error::invalid_request("ingredient name must not be empty")
                    .with_details(json!({"field": "ingredients"})),
            );
        }
        Ok(Ingredient {
            name,
            quantity: self.quantity.unwrap_or(1),
        })
    }
}

impl MacrosPayload {
    fn into_macros(self) -> Result<Macros, Error> {
        Ok(Macros {
            protein: require_field(self.protein, "macros.protein")?,
            carbs: require_field(self.carbs, "macros.carbs")?,
            fats: require_field(self.fats, "macros.fats")?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MacrosResponse {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Stored meal returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub name: String,
    pub ingredients: Vec<IngredientResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[schema(example = "breakfast")]
    pub meal_type: String,
    pub calories: f64,
    pub macros: MacrosResponse,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        Self {
            id: meal.id,
            name: meal.name,
            ingredients: meal
                .ingredients
                .into_iter()
                .map(|ingredient| IngredientResponse {
                    name: ingredient.name,
                    quantity: ingredient.quantity,
                })
                .collect(),
            instructions: meal.instructions,
            meal_type: meal.meal_type.to_string(),
            calories: meal.calories,
            macros: MacrosResponse {
                protein: meal.macros.protein,
                carbs: meal.macros.carbs,
                fats: meal.macros.fats,
            },
            created_at: meal.created_at,
        }
    }
}

/// List the caller's meals, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/meals",
    responses(
        (status = 200, description = "All meals owned by the caller", body = [MealResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["meals"],
    operation_id = "listMeals"
)]
#[get("/meals")]
pub async fn list_meals(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<HttpResponse> {
    let meals = state
        .meals
        .list_for_owner(identity.user_id())
        .await
        .map_err(map_meal_persistence_error)?;
    let body: Vec<MealResponse> = meals.into_iter().map(MealResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Create a meal owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/meals",
    request_body = MealPayload,
    responses(
        (status = 201, description = "Meal created", body = MealResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Missing or invalid token")
    ),
    tags = ["meals"],
    operation_id = "createMeal"
)]
#[post("/meals")]
pub async fn create_meal(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<MealPayload>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let meal = Meal::create(*identity.user_id(), draft);
    state
        .meals
        .insert(&meal)
        .await
        .map_err(map_meal_persistence_error)?;
    Ok(HttpResponse::Created().json(MealResponse::from(meal)))
}

/// Replace the meal matching `(id, caller)` wholesale.
#[utoipa::path(
    put,
    path = "/api/v1/meals/{id}",
    params(("id" = String, Path, description = "Meal identifier")),
    request_body = MealPayload,
    responses(
        (status = 200, description = "Updated meal", body = MealResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No meal matched the id for this caller")
    ),
    tags = ["meals"],
    operation_id = "updateMeal"
)]
#[put("/meals/{id}")]
pub async fn update_meal(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
    payload: web::Json<MealPayload>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    let meal = state
        .meals
        .replace(identity.user_id(), id.into_inner(), &draft)
        .await
        .map_err(map_meal_persistence_error)?;
    Ok(HttpResponse::Ok().json(MealResponse::from(meal)))
}

/// Delete the meal matching `(id, caller)`.
#[utoipa::path(
    delete,
    path = "/api/v1/meals/{id}",
    params(("id" = String, Path, description = "Meal identifier")),
    responses(
        (status = 204, description = "Meal deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No meal matched the id for this caller")
    ),
    tags = ["meals"],
    operation_id = "deleteMeal"
)]
#[delete("/meals/{id}")]
pub async fn delete_meal(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .meals
        .delete(identity.user_id(), id.into_inner())
        .await
        .map_err(map_meal_persistence_error)?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use crate::test_support::{authed, register_and_login, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn pancakes() -> Value {
        json!({
            "name": "Pancakes",
            "ingredients": [
                {"name": "Flour", "quantity": 2},
                {"name": "Eggs", "quantity": 3}
            ],
            "instructions": "Whisk, rest, fry.",
            "mealType": "breakfast",
            "calories": 450.0,
            "macros": {"protein": 12.0, "carbs": 60.0, "fats": 14.0}
        })
    }

    #[actix_web::test]
    async fn create_returns_the_stored_meal() {
        let app = test::init_service(test_app()).await;
        let token = register_and_login(&app, "meals-a@example.com").await;
        let res = test::call_service(
            &app,
            authed(test::TestRequest::post().uri("/api/v1/meals"), &token)
                .set_json(pancakes())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["name"], "Pancakes");
        assert_eq!(value["mealType"], "breakfast");
        assert_eq!(value["macros"]["protein"], 12.0);
        assert!(value["id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[actix_web::test]
    async fn list_returns_only_the_callers_meals_oldest_first() {
        let app = test::init_service(test_app()).await;
        let token_a = register_and_login(&app, "meals-b@example.com").await;
        let token_b = register_and_login(&app, "meals-c@example.com").await;

        for name in ["Porridge", "Omelette"] {
            let mut body = pancakes();
            body["name"] = json!(name);
            let res = test::call_service(
                &app,
                authed(test::TestRequest::post().uri("/api/v1/meals"), &token_a)
                    .set_json(&body)
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let res = test::call_service(
            &app,
            authed(test::TestRequest::get().uri("/api/v1/meals"), &token_a).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: Value = test::read_body_json(res).await;
        let names: Vec<_> = value
            .as_array()
            .expect("meal array")
            .iter()
            .map(|meal| meal["name"].as_str().expect("name"))
            .collect();
        assert_eq!(names, ["Porridge", "Omelette"]);

        let res = test::call_service(
            &app,
            authed(test::TestRequest::get().uri("/api/v1/meals"), &token_b).to_request(),
        )
        .await;
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value, json!([]));
    }

    #[rstest]
    #[case("name")]
    #[case("ingredients")]
    #[case("mealType")]
    #[case("calories")]
    #[case("macros")]
    #[actix_web::test]
    async fn create_reports_each_missing_field(#[case] field: &str) {
        let app = test::init_service(test_app()).await;
        let token = register_and_login(&app, "meals-d@example.com").await;
        let mut body = pancakes();
        body.as_object_mut().expect("object").remove(field);
        let res = test::call_service(
            &app,
            authed(test::TestRequest::post().uri("/api/v1/meals"), &token)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["details"]["field"], field);
    }

    #[actix_web::test]
    async fn create_rejects_unknown_meal_type() {
        let app = test::init_service(test_app()).await;
        let token = register_and_login(&app, "meals-e@example.com").await;
        let mut body = pancakes();
        body["mealType"] = json!("brunch");
        let res = test::call_service(
            &app,
            authed(test::TestRequest::post().uri("/api/v1/meals"), &token)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn update_replaces_the_whole_document() {
        let app = test::init_service(test_app()).await;
        let token = register_and_login(&app, "meals-f@example.com").await;
        let res = test::call_service(
            &app,
            authed(test::TestRequest::post().uri("/api/v1/meals"), &token)
                .set_json(pancakes())
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(res).await;
        let id = created["id"].as_str().expect("id").to_owned();

        let mut body = pancakes();
        body["name"] = json!("Protein pancakes");
        body["macros"]["protein"] = json!(30.0);
        body.as_object_mut().expect("object").remove("instructions");
        let res = test::call_service(
            &app,
            authed(test::TestRequest::put().uri(&format!("/api/v1/meals/{id}")), &token)
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["name"], "Protein pancakes");
        assert_eq!(value["macros"]["protein"], 30.0);
        assert!(value.get("instructions").is_none());
    }

    #[actix_web::test]
    async fn update_of_foreign_meal_is_not_found() {
        let app = test::init_service(test_app()).await;
        let token_a = register_and_login(&app, "meals-g@example.com").await;
        let token_b = register_and_login(&app, "meals-h@example.com").await;

        let res = test::call_service(
            &app,
            authed(test::TestRequest::post().uri("/api/v1/meals"), &token_a)
                .set_json(pancakes())
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(res).await;
        let id = created["id"].as_str().expect("id").to_owned();

        let res = test::call_service(
            &app,
            authed(test::TestRequest::put().uri(&format!("/api/v1/meals/{id}")), &token_b)
                .set_json(pancakes())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_removes_the_meal_and_repeat_delete_is_not_found() {
        let app = test::init_service(test_app()).await;
        let token = register_and_login(&app, "meals-i@example.com").await;
        let res = test::call_service(
            &app,
            authed(test::TestRequest::post().uri("/api/v1/meals"), &token)
                .set_json(pancakes())
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(res).await;
        let id = created["id"].as_str().expect("id").to_owned();

        let res = test::call_service(
            &app,
            authed(
                test::TestRequest::delete().uri(&format!("/api/v1/meals/{id}")),
                &token,
            )
            .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = test::call_service(
            &app,
            authed(
                test::TestRequest::delete().uri(&format!("/api/v1/meals/{id}")),
                &token,
            )
            .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn delete_of_foreign_meal_is_not_found_and_leaves_it_intact() {
        let app = test::init_service(test_app()).await;
        let token_a = register_and_login(&app, "meals-j@example.com").await;
        let token_b = register_and_login(&app, "meals-k@example.com").await;

        let res = test::call_service(
            &app,
            authed(test::TestRequest::post().uri("/api/v1/meals"), &token_a)
                .set_json(pancakes())
                .to_request(),
        )
        .await;
        let created: Value = test::read_body_json(res).await;
        let id = created["id"].as_str().expect("id").to_owned();

        let res = test::call_service(
            &app,
            authed(
                test::TestRequest::delete().uri(&format!("/api/v1/meals/{id}")),
                &token_b,
            )
            .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = test::call_service(
            &app,
            authed(test::TestRequest::get().uri("/api/v1/meals"), &token_a).to_request(),
        )
        .await;
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value.as_array().expect("meal array").len(), 1);
    }

    #[actix_web::test]
    async fn meals_require_a_bearer_token() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/meals").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
