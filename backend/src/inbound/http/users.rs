//! Registration and login handlers.
//!
//! ```text
//! POST /api/v1/register {"email":"u1@example.com","password":"...","name":"..."}
//! POST /api/v1/login    {"email":"u1@example.com","password":"..."}
//! ```
//!
//! Both routes are public; everything else under the API scope requires the
//! bearer token that login returns.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::require_field;

/// Request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Public view of a registered user. Never carries credential material.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUserResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "u1@example.com")]
    pub email: String,
    #[schema(example = "Test User")]
    pub name: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            name: user.name().to_string(),
        }
    }
}

/// Request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful login body carrying the bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = RegisteredUserResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Email already registered")
    ),
    tags = ["users"],
    operation_id = "register",
    security(())
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let registration = Registration {
        email: require_field(email, "email")?,
        password: require_field(password, "password")?,
        name: require_field(name, "name")?,
    };
    let user = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisteredUserResponse::from(user)))
}

/// Authenticate and mint a session token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials")
    ),
    tags = ["users"],
    operation_id = "login",
    security(())
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let email = require_field(email, "email")?;
    let password = require_field(password, "password")?;
    let token = state.auth.login(&email, &password).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn register_returns_identity_without_credentials() {
        let app = test::init_service(test_app()).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({
                "email": "U1@Example.com",
                "password": "Passw0rd!",
                "name": "Test User"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let value: Value = test::read_body_json(res).await;
        assert!(value.get("id").is_some());
        assert_eq!(value["email"], "u1@example.com");
        assert_eq!(value["name"], "Test User");
        assert!(value.get("password").is_none());
        assert!(value.get("passwordHash").is_none());
    }

    #[actix_web::test]
    async fn duplicate_registration_conflicts() {
        let app = test::init_service(test_app()).await;
        let body = json!({
            "email": "dup@example.com",
            "password": "Passw0rd!",
            "name": "First"
        });
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({
                    "email": "DUP@example.com",
                    "password": "other",
                    "name": "Second"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["code"], 409);
    }

    #[rstest]
    #[case(json!({"password": "pw", "name": "N"}), "email")]
    #[case(json!({"email": "a@b.co", "name": "N"}), "password")]
    #[case(json!({"email": "a@b.co", "password": "pw"}), "name")]
    #[actix_web::test]
    async fn register_rejects_missing_fields(#[case] body: Value, #[case] field: &str) {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["details"]["field"], field);
    }

    #[actix_web::test]
    async fn login_returns_verifiable_token() {
        let app = test::init_service(test_app()).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({
                    "email": "login@example.com",
                    "password": "Passw0rd!",
                    "name": "Login User"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({"email": "login@example.com", "password": "Passw0rd!"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let value: Value = test::read_body_json(res).await;
        assert!(value["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[rstest]
    #[case("login2@example.com", "wrong")]
    #[case("nobody@example.com", "Passw0rd!")]
    #[actix_web::test]
    async fn failed_logins_share_one_error_shape(#[case] email: &str, #[case] password: &str) {
        let app = test::init_service(test_app()).await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(json!({
                    "email": "login2@example.com",
                    "password": "Passw0rd!",
                    "name": "Login User"
                }))
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({"email": email, "password": password}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let value: Value = test::read_body_json(res).await;
        assert_eq!(value["code"], 401);
        assert_eq!(value["message"], "invalid credentials");
    }
}
