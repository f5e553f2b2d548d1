//! End-to-end flow over the full application: register, log in, manage
//! meals and lists, and verify cross-user isolation.

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use mealplanner_backend::test_support::{authed, register_and_login, test_app};

#[actix_web::test]
async fn register_login_and_manage_meals() {
    let app = test::init_service(test_app()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({
                "email": "u1@example.com",
                "password": "Passw0rd!",
                "name": "Planner",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let registered: Value = test::read_body_json(res).await;
    assert_eq!(registered["email"], "u1@example.com");
    assert!(registered.get("password").is_none());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"email": "u1@example.com", "password": "Passw0rd!"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let token = body["token"].as_str().expect("token").to_owned();

    let res = test::call_service(
        &app,
        authed(test::TestRequest::post().uri("/api/v1/meals"), &token)
            .set_json(json!({
                "name": "Pancakes",
                "ingredients": [{"name": "Flour", "quantity": 2}],
                "instructions": "Whisk and fry.",
                "mealType": "breakfast",
                "calories": 450.0,
                "macros": {"protein": 12.0, "carbs": 60.0, "fats": 14.0},
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let meal_id = created["id"].as_str().expect("meal id").to_owned();

    let res = test::call_service(
        &app,
        authed(test::TestRequest::get().uri("/api/v1/meals"), &token).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let meals: Value = test::read_body_json(res).await;
    let meals = meals.as_array().expect("meal array");
    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0]["name"], "Pancakes");

    let res = test::call_service(
        &app,
        authed(
            test::TestRequest::delete().uri(&format!("/api/v1/meals/{meal_id}")),
            &token,
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        authed(test::TestRequest::get().uri("/api/v1/meals"), &token).to_request(),
    )
    .await;
    let meals: Value = test::read_body_json(res).await;
    assert_eq!(meals, json!([]));
}

#[actix_web::test]
async fn grocery_flow_round_trips() {
    let app = test::init_service(test_app()).await;
    let token = register_and_login(&app, "flow-lists@example.com").await;

    let res = test::call_service(
        &app,
        authed(test::TestRequest::get().uri("/api/v1/grocery-list"), &token).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let list: Value = test::read_body_json(res).await;
    assert_eq!(list["items"], json!([]));

    let res = test::call_service(
        &app,
        authed(test::TestRequest::post().uri("/api/v1/grocery-list"), &token)
            .set_json(json!({"items": [{"name": "Flour"}, {"name": "Eggs", "quantity": 12}]}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let list: Value = test::read_body_json(res).await;
    let items = list["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    let flour_id = items[0]["id"].as_str().expect("item id").to_owned();

    let res = test::call_service(
        &app,
        authed(
            test::TestRequest::delete().uri(&format!("/api/v1/grocery-list?itemId={flour_id}")),
            &token,
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        authed(test::TestRequest::get().uri("/api/v1/grocery-list"), &token).to_request(),
    )
    .await;
    let list: Value = test::read_body_json(res).await;
    let items = list["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Eggs");
}

#[actix_web::test]
async fn users_cannot_observe_each_other() {
    let app = test::init_service(test_app()).await;
    let token_a = register_and_login(&app, "flow-a@example.com").await;
    let token_b = register_and_login(&app, "flow-b@example.com").await;

    let res = test::call_service(
        &app,
        authed(test::TestRequest::post().uri("/api/v1/meals"), &token_a)
            .set_json(json!({
                "name": "Secret stew",
                "ingredients": [{"name": "Carrots", "quantity": 3}],
                "mealType": "dinner",
                "calories": 320.0,
                "macros": {"protein": 8.0, "carbs": 40.0, "fats": 9.0},
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    let meal_id = created["id"].as_str().expect("meal id").to_owned();

    let res = test::call_service(
        &app,
        authed(test::TestRequest::get().uri("/api/v1/meals"), &token_b).to_request(),
    )
    .await;
    let meals: Value = test::read_body_json(res).await;
    assert_eq!(meals, json!([]));

    let res = test::call_service(
        &app,
        authed(
            test::TestRequest::delete().uri(&format!("/api/v1/meals/{meal_id}")),
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
    let meals: Value = test::read_body_json(res).await;
    assert_eq!(meals.as_array().expect("meal array").len(), 1);
}

#[actix_web::test]
async fn error_envelope_is_consistent() {
    let app = test::init_service(test_app()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/meals").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], 401);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}
