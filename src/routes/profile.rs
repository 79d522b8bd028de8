use actix_web::{web, HttpResponse};

use crate::models::{Actor, ApplicationsResponse, HealthResponse, LocationResponse, UpdateLocationRequest};
use crate::routes::AppState;
use crate::services::BoardError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/profile/location", web::put().to(update_location))
        .route("/seeker/applications", web::get().to(seeker_applications));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let status = if state.board.health().await {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Set the caller's address
///
/// PUT /api/v1/profile/location
///
/// Request body:
/// ```json
/// {
///   "streetAddress": "12 Allen Avenue",
///   "city": "Ikeja",
///   "postalCode": "100271"
/// }
/// ```
async fn update_location(
    state: web::Data<AppState>,
    actor: Actor,
    req: web::Json<UpdateLocationRequest>,
) -> Result<HttpResponse, BoardError> {
    let location = state.board.update_location(actor, &req).await?;
    Ok(HttpResponse::Ok().json(LocationResponse { location }))
}

/// The calling seeker's applications, newest first
async fn seeker_applications(
    state: web::Data<AppState>,
    actor: Actor,
) -> Result<HttpResponse, BoardError> {
    let applications = state.board.seeker_applications(actor).await?;
    Ok(HttpResponse::Ok().json(ApplicationsResponse::from(applications)))
}
