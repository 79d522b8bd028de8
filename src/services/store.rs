use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Address, Application, ApplicationStatus, BoundingBox, JobDetails, JobPosting, JobStatus,
    Location, NewApplication, NewJobPosting, UserLocation,
};

/// Errors that can occur when reading or writing job board records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

/// Order in which postings are listed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobOrder {
    /// Insertion order (ascending id); search relies on this for tie-breaking
    #[default]
    Oldest,
    /// Newest first, for dashboards
    Newest,
}

/// Filter for listing postings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub employer_id: Option<i64>,
    pub within: Option<BoundingBox>,
    pub order: JobOrder,
}

impl JobFilter {
    /// Active postings inside a pre-filter box, oldest first
    pub fn active_within(bbox: BoundingBox) -> Self {
        Self {
            status: Some(JobStatus::Active),
            within: Some(bbox),
            ..Self::default()
        }
    }

    pub fn employer(employer_id: i64) -> Self {
        Self {
            employer_id: Some(employer_id),
            ..Self::default()
        }
    }

    pub fn newest_first(mut self) -> Self {
        self.order = JobOrder::Newest;
        self
    }
}

/// Filter for listing applications, always newest submission first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub job_id: Option<i64>,
    pub applicant_id: Option<i64>,
    /// Applications to any posting owned by this employer
    pub employer_id: Option<i64>,
}

impl ApplicationFilter {
    pub fn job(job_id: i64) -> Self {
        Self {
            job_id: Some(job_id),
            ..Self::default()
        }
    }

    pub fn applicant(applicant_id: i64) -> Self {
        Self {
            applicant_id: Some(applicant_id),
            ..Self::default()
        }
    }

    pub fn employer(employer_id: i64) -> Self {
        Self {
            employer_id: Some(employer_id),
            ..Self::default()
        }
    }
}

/// Persistence for postings, applications and user locations
///
/// Each call is atomic on its own; concurrent updates to the same row are last write wins.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn health_check(&self) -> Result<bool, StoreError>;

    async fn get_user_location(&self, user_id: i64) -> Result<Option<UserLocation>, StoreError>;

    async fn upsert_user_location(
        &self,
        user_id: i64,
        address: &Address,
        location: Location,
    ) -> Result<UserLocation, StoreError>;

    async fn insert_job(&self, job: NewJobPosting) -> Result<JobPosting, StoreError>;

    async fn get_job(&self, job_id: i64) -> Result<Option<JobPosting>, StoreError>;

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, StoreError>;

    async fn update_job_details(
        &self,
        job_id: i64,
        details: &JobDetails,
    ) -> Result<JobPosting, StoreError>;

    /// Fails with [`StoreError::Conflict`] when the stored posting is archived and `status` is not
    async fn set_job_status(&self, job_id: i64, status: JobStatus) -> Result<JobPosting, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the applicant already applied to the job
    async fn insert_application(&self, application: NewApplication) -> Result<Application, StoreError>;

    async fn get_application(&self, application_id: i64) -> Result<Option<Application>, StoreError>;

    async fn find_application(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> Result<Option<Application>, StoreError>;

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, StoreError>;

    /// Sets the status and advances `updated_at` to now
    async fn update_application_status(
        &self,
        application_id: i64,
        status: &ApplicationStatus,
    ) -> Result<Application, StoreError>;
}
