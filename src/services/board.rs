use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use crate::core::analytics::{compute_snapshot, AnalyticsSnapshot};
use crate::core::matcher::{JobMatcher, SearchError, SearchQuery};
use crate::models::{
    Actor, Address, Application, ApplicationStatus, ApplyRequest, CreateJobRequest, DomainError,
    EmployerJobEntry, JobDetailResponse, JobDetails, JobPosting, JobStatus, Location,
    NewApplication, NewJobPosting, Role, SearchJobsQuery, SearchJobsResponse,
    UpdateApplicationStatusRequest, UpdateJobRequest, UpdateLocationRequest, UserLocation,
};
use crate::models::requests::non_empty;
use crate::models::responses::round_km;
use crate::services::geocoding::{Geocoded, Geocoder};
use crate::services::store::{ApplicationFilter, JobFilter, JobStore, StoreError};

/// Errors surfaced by job board operations
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Address could not be resolved to a location")]
    AddressUnresolved,

    #[error("Location is {distance_km:.1} km from the service area center, limit is {radius_km} km")]
    OutsideServiceArea { distance_km: f64, radius_km: f64 },

    #[error("Set your location before searching for jobs")]
    LocationRequired,

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for BoardError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(what) => BoardError::NotFound(what),
            StoreError::Conflict(what) => BoardError::Conflict(what),
            other => BoardError::Store(other),
        }
    }
}

impl From<DomainError> for BoardError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::ArchivedJob => BoardError::Conflict(error.to_string()),
            other => BoardError::Validation(other.to_string()),
        }
    }
}

impl From<SearchError> for BoardError {
    fn from(error: SearchError) -> Self {
        BoardError::Validation(error.to_string())
    }
}

impl From<validator::ValidationErrors> for BoardError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BoardError::Validation(errors.to_string())
    }
}

/// Job board use cases
///
/// Every operation takes the calling [`Actor`] and enforces role and ownership
/// before touching storage.
pub struct JobBoard {
    store: Arc<dyn JobStore>,
    geocoder: Arc<dyn Geocoder>,
    matcher: JobMatcher,
}

impl JobBoard {
    pub fn new(store: Arc<dyn JobStore>, geocoder: Arc<dyn Geocoder>, matcher: JobMatcher) -> Self {
        Self {
            store,
            geocoder,
            matcher,
        }
    }

    pub async fn health(&self) -> bool {
        match self.store.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::error!("Store health check failed: {}", e);
                false
            }
        }
    }

    /// Geocode and save the caller's address as their search origin
    ///
    /// The previous location is kept when the new address does not resolve.
    pub async fn update_location(
        &self,
        actor: Actor,
        request: &UpdateLocationRequest,
    ) -> Result<UserLocation, BoardError> {
        request.validate()?;
        let address = request.address();
        let location = self.resolve(&address).await?;

        let saved = self
            .store
            .upsert_user_location(actor.user_id, &address, location)
            .await?;

        tracing::info!("Updated location for user {}", actor.user_id);
        Ok(saved)
    }

    /// Publish a posting at a geocoded address inside the service area
    pub async fn create_job(
        &self,
        actor: Actor,
        request: &CreateJobRequest,
    ) -> Result<JobPosting, BoardError> {
        require_role(actor, Role::Employer)?;
        request.validate()?;
        let details = request.details()?;
        check_salary_range(&details)?;

        let address = request.address();
        let location = self.resolve(&address).await?;

        let engine = self.matcher.engine();
        if !engine.within_service_area(location) {
            let distance_km = engine.distance_from_center(location);
            tracing::info!(
                "Rejected posting by employer {}: {:.1} km from service area center",
                actor.user_id,
                distance_km
            );
            return Err(BoardError::OutsideServiceArea {
                distance_km,
                radius_km: engine.service_area().radius_km(),
            });
        }

        let posting = self
            .store
            .insert_job(NewJobPosting {
                employer_id: actor.user_id,
                details,
                address,
                location,
            })
            .await?;

        tracing::info!("Employer {} created job {}", actor.user_id, posting.id);
        Ok(posting)
    }

    /// Edit a posting's details; its address and location never change
    pub async fn update_job(
        &self,
        actor: Actor,
        job_id: i64,
        request: &UpdateJobRequest,
    ) -> Result<JobPosting, BoardError> {
        self.owned_job(actor, job_id).await?;
        request.validate()?;
        let details = request.details()?;
        check_salary_range(&details)?;

        let posting = self.store.update_job_details(job_id, &details).await?;
        tracing::info!("Employer {} updated job {}", actor.user_id, job_id);
        Ok(posting)
    }

    /// Pause an active posting or reactivate a paused one
    pub async fn toggle_job_status(&self, actor: Actor, job_id: i64) -> Result<JobPosting, BoardError> {
        let job = self.owned_job(actor, job_id).await?;
        let status = job.status.toggled()?;

        let posting = self.store.set_job_status(job_id, status).await?;
        tracing::info!("Job {} is now {}", job_id, posting.status);
        Ok(posting)
    }

    pub async fn archive_job(&self, actor: Actor, job_id: i64) -> Result<JobPosting, BoardError> {
        let job = self.owned_job(actor, job_id).await?;
        if job.status == JobStatus::Archived {
            return Ok(job);
        }

        let posting = self.store.set_job_status(job_id, JobStatus::Archived).await?;
        tracing::info!("Job {} archived", job_id);
        Ok(posting)
    }

    /// Radius search around the seeker's saved location
    pub async fn search_jobs(
        &self,
        actor: Actor,
        params: &SearchJobsQuery,
    ) -> Result<SearchJobsResponse, BoardError> {
        require_role(actor, Role::JobSeeker)?;

        let radius_km = params.radius.unwrap_or(self.matcher.default_radius_km());
        let query = SearchQuery::new(
            params.keyword.as_deref(),
            params.category.as_deref(),
            radius_km,
        )?;

        let origin = self
            .store
            .get_user_location(actor.user_id)
            .await?
            .ok_or(BoardError::LocationRequired)?
            .location;

        let candidates = self
            .store
            .list_jobs(&JobFilter::active_within(query.bounding_box(origin)))
            .await?;

        tracing::debug!(
            "Searching {} candidates for user {} within {} km",
            candidates.len(),
            actor.user_id,
            query.radius_km
        );

        let result = self.matcher.search(origin, &query, candidates);

        tracing::info!(
            "Returning {} jobs for user {} (from {} candidates)",
            result.matches.len(),
            actor.user_id,
            result.total_candidates
        );

        Ok(SearchJobsResponse::new(result, &query))
    }

    /// A single posting; seekers also get their distance and whether they applied
    pub async fn view_job(&self, actor: Actor, job_id: i64) -> Result<JobDetailResponse, BoardError> {
        let job = self.find_job(job_id).await?;

        if actor.role != Role::JobSeeker {
            return Ok(JobDetailResponse {
                job,
                distance_km: None,
                already_applied: false,
            });
        }

        let distance_km = self
            .store
            .get_user_location(actor.user_id)
            .await?
            .map(|saved| self.matcher.engine().distance(saved.location, job.location));
        let already_applied = self
            .store
            .find_application(job_id, actor.user_id)
            .await?
            .is_some();

        Ok(JobDetailResponse {
            job,
            distance_km: distance_km.map(round_km),
            already_applied,
        })
    }

    /// Apply once to an active posting
    pub async fn apply(
        &self,
        actor: Actor,
        job_id: i64,
        request: &ApplyRequest,
    ) -> Result<Application, BoardError> {
        require_role(actor, Role::JobSeeker)?;
        request.validate()?;

        let job = self.find_job(job_id).await?;
        if job.status != JobStatus::Active {
            return Err(BoardError::Conflict(format!(
                "job {} is {} and not accepting applications",
                job_id, job.status
            )));
        }

        let application = self
            .store
            .insert_application(NewApplication {
                job_id,
                applicant_id: actor.user_id,
                resume_id: request.resume_id,
                cover_letter: non_empty(request.cover_letter.as_deref()),
            })
            .await?;

        tracing::info!("User {} applied to job {}", actor.user_id, job_id);
        Ok(application)
    }

    pub async fn job_applications(
        &self,
        actor: Actor,
        job_id: i64,
    ) -> Result<Vec<Application>, BoardError> {
        self.owned_job(actor, job_id).await?;
        Ok(self
            .store
            .list_applications(&ApplicationFilter::job(job_id))
            .await?)
    }

    /// Move an application to another funnel stage
    pub async fn update_application_status(
        &self,
        actor: Actor,
        application_id: i64,
        request: &UpdateApplicationStatusRequest,
    ) -> Result<Application, BoardError> {
        require_role(actor, Role::Employer)?;
        request.validate()?;
        let status = ApplicationStatus::parse_known(request.status.trim())?;

        let application = self
            .store
            .get_application(application_id)
            .await?
            .ok_or_else(|| BoardError::NotFound(format!("application {}", application_id)))?;
        self.owned_job(actor, application.job_id).await?;

        let updated = self
            .store
            .update_application_status(application_id, &status)
            .await?;

        tracing::info!(
            "Application {} moved from {} to {}",
            application_id,
            application.status,
            updated.status
        );
        Ok(updated)
    }

    /// The employer's postings, newest first, with their application counts
    pub async fn employer_jobs(&self, actor: Actor) -> Result<Vec<EmployerJobEntry>, BoardError> {
        require_role(actor, Role::Employer)?;

        let jobs = self
            .store
            .list_jobs(&JobFilter::employer(actor.user_id).newest_first())
            .await?;
        let applications = self
            .store
            .list_applications(&ApplicationFilter::employer(actor.user_id))
            .await?;

        Ok(jobs
            .into_iter()
            .map(|job| {
                let application_count = applications.iter().filter(|a| a.job_id == job.id).count();
                EmployerJobEntry {
                    job,
                    application_count,
                }
            })
            .collect())
    }

    pub async fn seeker_applications(&self, actor: Actor) -> Result<Vec<Application>, BoardError> {
        require_role(actor, Role::JobSeeker)?;
        Ok(self
            .store
            .list_applications(&ApplicationFilter::applicant(actor.user_id))
            .await?)
    }

    /// Funnel analytics over the employer's current postings and applications
    pub async fn analytics(&self, actor: Actor) -> Result<AnalyticsSnapshot, BoardError> {
        require_role(actor, Role::Employer)?;

        let jobs = self
            .store
            .list_jobs(&JobFilter::employer(actor.user_id))
            .await?;
        let applications = self
            .store
            .list_applications(&ApplicationFilter::employer(actor.user_id))
            .await?;

        Ok(compute_snapshot(&jobs, &applications))
    }

    async fn resolve(&self, address: &Address) -> Result<Location, BoardError> {
        match self.geocoder.geocode(address).await {
            Geocoded::Resolved(location) => Ok(location),
            Geocoded::Unresolved(reason) => {
                tracing::debug!("Address unresolved ({:?}): {}", reason, address.one_line());
                Err(BoardError::AddressUnresolved)
            }
        }
    }

    async fn find_job(&self, job_id: i64) -> Result<JobPosting, BoardError> {
        self.store
            .get_job(job_id)
            .await?
            .ok_or_else(|| BoardError::NotFound(format!("job {}", job_id)))
    }

    async fn owned_job(&self, actor: Actor, job_id: i64) -> Result<JobPosting, BoardError> {
        require_role(actor, Role::Employer)?;
        let job = self.find_job(job_id).await?;
        if job.employer_id != actor.user_id {
            return Err(BoardError::Forbidden(format!(
                "job {} belongs to another employer",
                job_id
            )));
        }
        Ok(job)
    }
}

fn require_role(actor: Actor, role: Role) -> Result<(), BoardError> {
    if actor.role == role {
        Ok(())
    } else {
        Err(BoardError::Forbidden(format!("only a {} can do this", role)))
    }
}

fn check_salary_range(details: &JobDetails) -> Result<(), BoardError> {
    match (details.salary_min, details.salary_max) {
        (Some(min), Some(max)) if min > max => Err(BoardError::Validation(format!(
            "salary_min {} exceeds salary_max {}",
            min, max
        ))),
        _ => Ok(()),
    }
}
