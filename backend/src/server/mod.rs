//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{AuthService, TokenCodec};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::health::health;
use crate::inbound::http::lists::{
    append_grocery_items, append_pantry_items, get_grocery_list, get_pantry_list,
    remove_grocery_item, remove_pantry_item, replace_grocery_items, replace_pantry_items,
};
use crate::inbound::http::meals::{create_meal, delete_meal, list_meals, update_meal};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, register};
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DieselListRepository, DieselMealRepository, DieselUserRepository,
};

/// Wire the Diesel adapters into handler state.
fn build_state(config: &ServerConfig) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(config.db_pool.clone()));
    let auth = AuthService::new(users, TokenCodec::new(&config.jwt_secret));
    HttpState::new(
        auth,
        Arc::new(DieselListRepository::new(config.db_pool.clone())),
        Arc::new(DieselMealRepository::new(config.db_pool.clone())),
    )
}

/// Assemble the application: payload error handlers, tracing middleware, the
/// `/api/v1` scope, and the unauthenticated root probe. Swagger UI is served
/// at `/docs` in debug builds only.
pub fn build_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(get_grocery_list)
        .service(append_grocery_items)
        .service(replace_grocery_items)
        .service(remove_grocery_item)
        .service(get_pantry_list)
        .service(append_pantry_items)
        .service(replace_pantry_items)
        .service(remove_pantry_item)
        .service(list_meals)
        .service(create_meal)
        .service(update_meal)
        .service(delete_meal);

    let app = App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(Trace)
        .service(api)
        .service(health);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind and spawn the HTTP server.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let state = build_state(&config);
    let server = HttpServer::new(move || build_app(state.clone()))
        .bind(config.bind_addr)?
        .run();
    Ok(server)
}
