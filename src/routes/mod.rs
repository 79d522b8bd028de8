// Route exports
pub mod auth;
pub mod employer;
pub mod jobs;
pub mod profile;

use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse, ResponseError};
use std::sync::Arc;

use crate::models::ErrorResponse;
use crate::services::{BoardError, JobBoard};

pub use auth::{AuthError, Claims, TokenVerifier};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<JobBoard>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(profile::configure)
            .configure(jobs::configure)
            .configure(employer::configure),
    );
}

impl ResponseError for BoardError {
    fn status_code(&self) -> StatusCode {
        match self {
            BoardError::Validation(_) => StatusCode::BAD_REQUEST,
            BoardError::Forbidden(_) => StatusCode::FORBIDDEN,
            BoardError::NotFound(_) => StatusCode::NOT_FOUND,
            BoardError::Conflict(_) => StatusCode::CONFLICT,
            BoardError::AddressUnresolved
            | BoardError::OutsideServiceArea { .. }
            | BoardError::LocationRequired => StatusCode::UNPROCESSABLE_ENTITY,
            BoardError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (error, message) = match self {
            BoardError::Validation(_) => ("validation_failed", self.to_string()),
            BoardError::Forbidden(_) => ("forbidden", self.to_string()),
            BoardError::NotFound(_) => ("not_found", self.to_string()),
            BoardError::Conflict(_) => ("conflict", self.to_string()),
            BoardError::AddressUnresolved => ("address_unresolved", self.to_string()),
            BoardError::OutsideServiceArea { .. } => ("outside_service_area", self.to_string()),
            BoardError::LocationRequired => ("location_required", self.to_string()),
            BoardError::Store(e) => {
                tracing::error!("Storage failure: {}", e);
                ("storage_error", "Internal storage error".to_string())
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error.to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}

/// Malformed request payload, rendered in the common error shape
#[derive(Debug)]
pub struct PayloadError(ErrorResponse);

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(&self.0)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    PayloadError(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    })
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    PayloadError(ErrorResponse {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    })
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_status_codes() {
        assert_eq!(BoardError::AddressUnresolved.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            BoardError::OutsideServiceArea {
                distance_km: 60.0,
                radius_km: 50.0
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(BoardError::Conflict("dup".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(BoardError::Forbidden("no".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(BoardError::Validation("bad".into()).status_code(), StatusCode::BAD_REQUEST);
    }
}
