//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the specification consumed by Swagger UI in debug
//! builds. Request and response schemas are the DTOs declared next to the
//! handlers; domain types never derive utoipa traits.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::lists::{ListItemPayload, ListItemResponse, ListRequest, ListResponse};
use crate::inbound::http::meals::{
    IngredientPayload, IngredientResponse, MacrosPayload, MacrosResponse, MealPayload,
    MealResponse,
};
use crate::inbound::http::users::{
    LoginRequest, RegisterRequest, RegisteredUserResponse, TokenResponse,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Meal planner API",
        description = "Personal meal planning: accounts, grocery and pantry lists, and meals."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::lists::get_grocery_list,
        crate::inbound::http::lists::append_grocery_items,
        crate::inbound::http::lists::replace_grocery_items,
        crate::inbound::http::lists::remove_grocery_item,
        crate::inbound::http::lists::get_pantry_list,
        crate::inbound::http::lists::append_pantry_items,
        crate::inbound::http::lists::replace_pantry_items,
        crate::inbound::http::lists::remove_pantry_item,
        crate::inbound::http::meals::list_meals,
        crate::inbound::http::meals::create_meal,
        crate::inbound::http::meals::update_meal,
        crate::inbound::http::meals::delete_meal,
        crate::inbound::http::health::health,
    ),
    components(schemas(
        RegisterRequest,
        RegisteredUserResponse,
        LoginRequest,
        TokenResponse,
        ListItemPayload,
        ListRequest,
        ListItemResponse,
        ListResponse,
        IngredientPayload,
        MacrosPayload,
        MealPayload,
        IngredientResponse,
        MacrosResponse,
        MealResponse,
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "lists", description = "Grocery and pantry lists"),
        (name = "meals", description = "Meal records"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_registers_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/grocery-list",
            "/api/v1/pantry-list",
            "/api/v1/meals",
            "/api/v1/meals/{id}",
            "/",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path '{path}' in the OpenAPI document"
            );
        }
    }

    #[test]
    fn document_registers_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
