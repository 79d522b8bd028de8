use actix_web::{web, HttpResponse};

use crate::models::{Actor, UpdateApplicationStatusRequest};
use crate::routes::AppState;
use crate::services::BoardError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/employer/jobs", web::get().to(employer_jobs))
        .route("/employer/analytics", web::get().to(analytics))
        .route(
            "/applications/{id}/status",
            web::put().to(update_application_status),
        );
}

/// Dashboard listing: the caller's postings with application counts
async fn employer_jobs(
    state: web::Data<AppState>,
    actor: Actor,
) -> Result<HttpResponse, BoardError> {
    let jobs = state.board.employer_jobs(actor).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// Funnel analytics, recomputed on every call
async fn analytics(state: web::Data<AppState>, actor: Actor) -> Result<HttpResponse, BoardError> {
    let snapshot = state.board.analytics(actor).await?;

    tracing::debug!(
        "Analytics for employer {}: {} applications over {} jobs",
        actor.user_id,
        snapshot.total_applications,
        snapshot.total_jobs
    );

    Ok(HttpResponse::Ok().json(snapshot))
}

/// Move an application to another stage
///
/// PUT /api/v1/applications/{id}/status
///
/// Request body:
/// ```json
/// { "status": "interview" }
/// ```
async fn update_application_status(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
    req: web::Json<UpdateApplicationStatusRequest>,
) -> Result<HttpResponse, BoardError> {
    let application = state
        .board
        .update_application_status(actor, path.into_inner(), &req)
        .await?;
    Ok(HttpResponse::Ok().json(application))
}
