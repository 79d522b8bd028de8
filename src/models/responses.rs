use serde::{Deserialize, Serialize};

use crate::core::matcher::{JobMatch, MatchResult, SearchQuery};
use crate::models::domain::{Application, JobPosting, UserLocation};

/// A posting in search results with its distance from the seeker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchView {
    pub job: JobPosting,
    pub distance_km: f64,
}

impl From<JobMatch> for JobMatchView {
    fn from(value: JobMatch) -> Self {
        Self {
            job: value.posting,
            distance_km: round_km(value.distance_km),
        }
    }
}

/// Response for the job search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchJobsResponse {
    pub jobs: Vec<JobMatchView>,
    pub total_results: usize,
    pub total_candidates: usize,
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub radius_km: f64,
}

impl SearchJobsResponse {
    pub fn new(result: MatchResult, query: &SearchQuery) -> Self {
        let jobs: Vec<JobMatchView> = result.matches.into_iter().map(Into::into).collect();
        Self {
            total_results: jobs.len(),
            jobs,
            total_candidates: result.total_candidates,
            keyword: query.keyword.clone(),
            category: query.category.clone(),
            radius_km: query.radius_km,
        }
    }
}

/// A single posting as seen by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailResponse {
    pub job: JobPosting,
    pub distance_km: Option<f64>,
    pub already_applied: bool,
}

/// Employer dashboard row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerJobEntry {
    pub job: JobPosting,
    pub application_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationsResponse {
    pub applications: Vec<Application>,
    pub count: usize,
}

impl From<Vec<Application>> for ApplicationsResponse {
    fn from(applications: Vec<Application>) -> Self {
        Self {
            count: applications.len(),
            applications,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub location: UserLocation,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Distances are displayed to two decimals
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}
