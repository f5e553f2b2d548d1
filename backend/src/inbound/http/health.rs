//! Liveness probe.

use actix_web::{HttpResponse, get};

/// Unauthenticated root endpoint confirming the service is up.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = String)),
    tags = ["health"],
    operation_id = "health",
    security(())
)]
#[get("/")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("meal planner api is running")
}
