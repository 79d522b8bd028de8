use actix_web::{web, HttpResponse};

use crate::models::{
    Actor, ApplicationsResponse, ApplyRequest, CreateJobRequest, SearchJobsQuery, UpdateJobRequest,
};
use crate::routes::AppState;
use crate::services::BoardError;

/// Configure job posting routes
///
/// `/jobs/search` is registered ahead of `/jobs/{id}` so it is not taken for an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/jobs/search", web::get().to(search_jobs))
        .route("/jobs", web::post().to(create_job))
        .route("/jobs/{id}", web::get().to(view_job))
        .route("/jobs/{id}", web::put().to(update_job))
        .route("/jobs/{id}/toggle-status", web::post().to(toggle_job_status))
        .route("/jobs/{id}/archive", web::post().to(archive_job))
        .route("/jobs/{id}/applications", web::post().to(apply))
        .route("/jobs/{id}/applications", web::get().to(job_applications));
}

/// Radius search around the caller's saved location
///
/// GET /api/v1/jobs/search?keyword=driver&category=transportation&radius=10
async fn search_jobs(
    state: web::Data<AppState>,
    actor: Actor,
    query: web::Query<SearchJobsQuery>,
) -> Result<HttpResponse, BoardError> {
    let response = state.board.search_jobs(actor, &query).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Publish a posting
///
/// POST /api/v1/jobs
///
/// Request body:
/// ```json
/// {
///   "title": "Delivery Rider",
///   "description": "Deliver parcels around Ikeja",
///   "category": "transportation",
///   "employmentType": "full_time",
///   "salaryMin": 80000,
///   "salaryMax": 120000,
///   "streetAddress": "12 Allen Avenue",
///   "city": "Ikeja",
///   "postalCode": "100271"
/// }
/// ```
async fn create_job(
    state: web::Data<AppState>,
    actor: Actor,
    req: web::Json<CreateJobRequest>,
) -> Result<HttpResponse, BoardError> {
    let job = state.board.create_job(actor, &req).await?;
    Ok(HttpResponse::Created().json(job))
}

async fn view_job(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse, BoardError> {
    let response = state.board.view_job(actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn update_job(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
    req: web::Json<UpdateJobRequest>,
) -> Result<HttpResponse, BoardError> {
    let job = state.board.update_job(actor, path.into_inner(), &req).await?;
    Ok(HttpResponse::Ok().json(job))
}

async fn toggle_job_status(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse, BoardError> {
    let job = state.board.toggle_job_status(actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

async fn archive_job(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse, BoardError> {
    let job = state.board.archive_job(actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// Apply to a posting
///
/// POST /api/v1/jobs/{id}/applications
///
/// Request body (both fields optional):
/// ```json
/// {
///   "resumeId": 3,
///   "coverLetter": "I have five years of experience..."
/// }
/// ```
async fn apply(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
    req: web::Json<ApplyRequest>,
) -> Result<HttpResponse, BoardError> {
    let application = state.board.apply(actor, path.into_inner(), &req).await?;
    Ok(HttpResponse::Created().json(application))
}

async fn job_applications(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<i64>,
) -> Result<HttpResponse, BoardError> {
    let applications = state.board.job_applications(actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApplicationsResponse::from(applications)))
}
