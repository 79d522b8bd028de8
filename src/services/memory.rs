use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::core::distance::is_within_bounding_box;
use crate::models::{
    Address, Application, ApplicationStatus, JobDetails, JobPosting, JobStatus, Location,
    NewApplication, NewJobPosting, UserLocation,
};
use crate::services::store::{ApplicationFilter, JobFilter, JobOrder, JobStore, StoreError};

#[derive(Default)]
struct MemoryState {
    jobs: BTreeMap<i64, JobPosting>,
    applications: BTreeMap<i64, Application>,
    locations: HashMap<i64, UserLocation>,
    next_job_id: i64,
    next_application_id: i64,
}

/// In-process storage for local runs and tests
///
/// Ids are assigned sequentially from 1, mirroring a database sequence.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an application row as-is, keeping its timestamps and status
    ///
    /// Used to load historical data; ids already in use are overwritten.
    pub async fn import_application(&self, application: Application) {
        let mut state = self.state.write().await;
        state.next_application_id = state.next_application_id.max(application.id);
        state.applications.insert(application.id, application);
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }

    async fn get_user_location(&self, user_id: i64) -> Result<Option<UserLocation>, StoreError> {
        Ok(self.state.read().await.locations.get(&user_id).cloned())
    }

    async fn upsert_user_location(
        &self,
        user_id: i64,
        address: &Address,
        location: Location,
    ) -> Result<UserLocation, StoreError> {
        let saved = UserLocation {
            user_id,
            address: address.clone(),
            location,
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .locations
            .insert(user_id, saved.clone());
        Ok(saved)
    }

    async fn insert_job(&self, job: NewJobPosting) -> Result<JobPosting, StoreError> {
        let mut state = self.state.write().await;
        state.next_job_id += 1;

        let now = Utc::now();
        let posting = JobPosting {
            id: state.next_job_id,
            employer_id: job.employer_id,
            title: job.details.title,
            description: job.details.description,
            category: job.details.category,
            employment_type: job.details.employment_type,
            salary_min: job.details.salary_min,
            salary_max: job.details.salary_max,
            address: job.address,
            location: job.location,
            status: JobStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.jobs.insert(posting.id, posting.clone());
        Ok(posting)
    }

    async fn get_job(&self, job_id: i64) -> Result<Option<JobPosting>, StoreError> {
        Ok(self.state.read().await.jobs.get(&job_id).cloned())
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, StoreError> {
        let state = self.state.read().await;
        let mut jobs: Vec<JobPosting> = state
            .jobs
            .values()
            .filter(|job| filter.status.map_or(true, |s| job.status == s))
            .filter(|job| filter.employer_id.map_or(true, |e| job.employer_id == e))
            .filter(|job| {
                filter
                    .within
                    .as_ref()
                    .map_or(true, |bbox| is_within_bounding_box(job.location, bbox))
            })
            .cloned()
            .collect();

        if filter.order == JobOrder::Newest {
            jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }
        Ok(jobs)
    }

    async fn update_job_details(
        &self,
        job_id: i64,
        details: &JobDetails,
    ) -> Result<JobPosting, StoreError> {
        let mut state = self.state.write().await;
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| StoreError::NotFound(format!("job {}", job_id)))?;
        job.apply_details(details);
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn set_job_status(&self, job_id: i64, status: JobStatus) -> Result<JobPosting, StoreError> {
        let mut state = self.state.write().await;
        let job = state
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| StoreError::NotFound(format!("job {}", job_id)))?;
        if job.status == JobStatus::Archived && status != JobStatus::Archived {
            return Err(StoreError::Conflict(format!("job {} is archived", job_id)));
        }
        job.status = status;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn insert_application(&self, application: NewApplication) -> Result<Application, StoreError> {
        let mut state = self.state.write().await;

        if !state.jobs.contains_key(&application.job_id) {
            return Err(StoreError::NotFound(format!("job {}", application.job_id)));
        }
        let duplicate = state.applications.values().any(|a| {
            a.job_id == application.job_id && a.applicant_id == application.applicant_id
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "user {} already applied to job {}",
                application.applicant_id, application.job_id
            )));
        }

        state.next_application_id += 1;
        let now = Utc::now();
        let saved = Application {
            id: state.next_application_id,
            job_id: application.job_id,
            applicant_id: application.applicant_id,
            resume_id: application.resume_id,
            cover_letter: application.cover_letter,
            status: ApplicationStatus::Applied,
            submitted_at: now,
            updated_at: now,
        };
        state.applications.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn get_application(&self, application_id: i64) -> Result<Option<Application>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .applications
            .get(&application_id)
            .cloned())
    }

    async fn find_application(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> Result<Option<Application>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .applications
            .values()
            .find(|a| a.job_id == job_id && a.applicant_id == applicant_id)
            .cloned())
    }

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, StoreError> {
        let state = self.state.read().await;
        let mut applications: Vec<Application> = state
            .applications
            .values()
            .filter(|a| filter.job_id.map_or(true, |id| a.job_id == id))
            .filter(|a| filter.applicant_id.map_or(true, |id| a.applicant_id == id))
            .filter(|a| {
                filter.employer_id.map_or(true, |employer_id| {
                    state
                        .jobs
                        .get(&a.job_id)
                        .is_some_and(|job| job.employer_id == employer_id)
                })
            })
            .cloned()
            .collect();

        applications.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        application_id: i64,
        status: &ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let mut state = self.state.write().await;
        let application = state
            .applications
            .get_mut(&application_id)
            .ok_or_else(|| StoreError::NotFound(format!("application {}", application_id)))?;
        application.status = status.clone();
        application.updated_at = Utc::now();
        Ok(application.clone())
    }
}
