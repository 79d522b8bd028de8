use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;

use crate::models::{
    Address, Application, ApplicationStatus, JobCategory, JobDetails, JobPosting, JobStatus,
    Location, NewApplication, NewJobPosting, UserLocation,
};
use crate::services::store::{ApplicationFilter, JobFilter, JobOrder, JobStore, StoreError};

const JOB_COLUMNS: &str = "id, employer_id, title, description, category, employment_type, \
     salary_min, salary_max, street_address, city, postal_code, latitude, longitude, status, \
     created_at, updated_at";

const APPLICATION_COLUMNS: &str =
    "id, job_id, applicant_id, resume_id, cover_letter, status, submitted_at, updated_at";

/// PostgreSQL-backed job board storage
///
/// Migrations in `./migrations` are applied on connect.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from optional settings, falling back to defaults
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::connect(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn job_from_row(row: &PgRow) -> Result<JobPosting, StoreError> {
    let status: String = row.try_get("status")?;
    let category: String = row.try_get("category")?;
    let latitude: f64 = row.try_get("latitude")?;
    let longitude: f64 = row.try_get("longitude")?;

    let location = Location::new(latitude, longitude)
        .map_err(|e| StoreError::InvalidRow(format!("job_postings: {}", e)))?;
    let status = status
        .parse::<JobStatus>()
        .map_err(|e| StoreError::InvalidRow(format!("job_postings: {}", e)))?;

    Ok(JobPosting {
        id: row.try_get("id")?,
        employer_id: row.try_get("employer_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: JobCategory::from_stored(&category),
        employment_type: row.try_get("employment_type")?,
        salary_min: row.try_get("salary_min")?,
        salary_max: row.try_get("salary_max")?,
        address: Address {
            street: row.try_get("street_address")?,
            city: row.try_get("city")?,
            postal_code: row.try_get("postal_code")?,
        },
        location,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn application_from_row(row: &PgRow) -> Result<Application, StoreError> {
    let status: String = row.try_get("status")?;

    Ok(Application {
        id: row.try_get("id")?,
        job_id: row.try_get("job_id")?,
        applicant_id: row.try_get("applicant_id")?,
        resume_id: row.try_get("resume_id")?,
        cover_letter: row.try_get("cover_letter")?,
        status: ApplicationStatus::from_stored(&status),
        submitted_at: row.try_get("submitted_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn user_location_from_row(row: &PgRow) -> Result<UserLocation, StoreError> {
    let latitude: f64 = row.try_get("latitude")?;
    let longitude: f64 = row.try_get("longitude")?;
    let location = Location::new(latitude, longitude)
        .map_err(|e| StoreError::InvalidRow(format!("user_locations: {}", e)))?;

    Ok(UserLocation {
        user_id: row.try_get("user_id")?,
        address: Address {
            street: row.try_get("street_address")?,
            city: row.try_get("city")?,
            postal_code: row.try_get("postal_code")?,
        },
        location,
        updated_at: row.try_get("updated_at")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl JobStore for PostgresStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    async fn get_user_location(&self, user_id: i64) -> Result<Option<UserLocation>, StoreError> {
        let query = r#"
            SELECT user_id, street_address, city, postal_code, latitude, longitude, updated_at
            FROM user_locations
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_location_from_row).transpose()
    }

    /// Uses INSERT ... ON CONFLICT so a user has exactly one saved location
    async fn upsert_user_location(
        &self,
        user_id: i64,
        address: &Address,
        location: Location,
    ) -> Result<UserLocation, StoreError> {
        let query = r#"
            INSERT INTO user_locations
                (user_id, street_address, city, postal_code, latitude, longitude, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                street_address = EXCLUDED.street_address,
                city = EXCLUDED.city,
                postal_code = EXCLUDED.postal_code,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, street_address, city, postal_code, latitude, longitude, updated_at
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.postal_code)
            .bind(location.latitude)
            .bind(location.longitude)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Saved location for user {}", user_id);

        user_location_from_row(&row)
    }

    async fn insert_job(&self, job: NewJobPosting) -> Result<JobPosting, StoreError> {
        let query = format!(
            r#"
            INSERT INTO job_postings
                (employer_id, title, description, category, employment_type, salary_min,
                 salary_max, street_address, city, postal_code, latitude, longitude, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(job.employer_id)
            .bind(&job.details.title)
            .bind(&job.details.description)
            .bind(job.details.category.as_str())
            .bind(&job.details.employment_type)
            .bind(job.details.salary_min)
            .bind(job.details.salary_max)
            .bind(&job.address.street)
            .bind(&job.address.city)
            .bind(&job.address.postal_code)
            .bind(job.location.latitude)
            .bind(job.location.longitude)
            .bind(JobStatus::Active.as_str())
            .fetch_one(&self.pool)
            .await?;

        job_from_row(&row)
    }

    async fn get_job(&self, job_id: i64) -> Result<Option<JobPosting>, StoreError> {
        let query = format!("SELECT {} FROM job_postings WHERE id = $1", JOB_COLUMNS);

        let row = sqlx::query(&query)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(job_from_row).transpose()
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobPosting>, StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM job_postings WHERE TRUE", JOB_COLUMNS));

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(employer_id) = filter.employer_id {
            builder.push(" AND employer_id = ").push_bind(employer_id);
        }
        if let Some(bbox) = filter.within {
            builder
                .push(" AND latitude BETWEEN ")
                .push_bind(bbox.min_lat)
                .push(" AND ")
                .push_bind(bbox.max_lat)
                .push(" AND longitude BETWEEN ")
                .push_bind(bbox.min_lon)
                .push(" AND ")
                .push_bind(bbox.max_lon);
        }
        builder.push(match filter.order {
            JobOrder::Oldest => " ORDER BY id ASC",
            JobOrder::Newest => " ORDER BY created_at DESC, id DESC",
        });

        let rows = builder.build().fetch_all(&self.pool).await?;

        tracing::debug!("Listed {} job postings for {:?}", rows.len(), filter);

        rows.iter().map(job_from_row).collect()
    }

    async fn update_job_details(
        &self,
        job_id: i64,
        details: &JobDetails,
    ) -> Result<JobPosting, StoreError> {
        let query = format!(
            r#"
            UPDATE job_postings
            SET title = $2, description = $3, category = $4, employment_type = $5,
                salary_min = $6, salary_max = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(job_id)
            .bind(&details.title)
            .bind(&details.description)
            .bind(details.category.as_str())
            .bind(&details.employment_type)
            .bind(details.salary_min)
            .bind(details.salary_max)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("job {}", job_id)))?;

        job_from_row(&row)
    }

    async fn set_job_status(&self, job_id: i64, status: JobStatus) -> Result<JobPosting, StoreError> {
        // Archived rows only accept archived, so a stale toggle cannot revive a posting
        let query = format!(
            r#"
            UPDATE job_postings SET status = $2, updated_at = NOW()
            WHERE id = $1 AND (status <> 'archived' OR $2 = 'archived')
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(job_id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => job_from_row(&row),
            None => match self.get_job(job_id).await? {
                Some(_) => Err(StoreError::Conflict(format!("job {} is archived", job_id))),
                None => Err(StoreError::NotFound(format!("job {}", job_id))),
            },
        }
    }

    async fn insert_application(&self, application: NewApplication) -> Result<Application, StoreError> {
        let query = format!(
            r#"
            INSERT INTO applications (job_id, applicant_id, resume_id, cover_letter, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(application.job_id)
            .bind(application.applicant_id)
            .bind(application.resume_id)
            .bind(&application.cover_letter)
            .bind(ApplicationStatus::Applied.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Conflict(format!(
                        "user {} already applied to job {}",
                        application.applicant_id, application.job_id
                    ))
                } else {
                    e.into()
                }
            })?;

        application_from_row(&row)
    }

    async fn get_application(&self, application_id: i64) -> Result<Option<Application>, StoreError> {
        let query = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);

        let row = sqlx::query(&query)
            .bind(application_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(application_from_row).transpose()
    }

    async fn find_application(
        &self,
        job_id: i64,
        applicant_id: i64,
    ) -> Result<Option<Application>, StoreError> {
        let query = format!(
            "SELECT {} FROM applications WHERE job_id = $1 AND applicant_id = $2",
            APPLICATION_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(job_id)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(application_from_row).transpose()
    }

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT a.id, a.job_id, a.applicant_id, a.resume_id, a.cover_letter, a.status, \
             a.submitted_at, a.updated_at \
             FROM applications a JOIN job_postings j ON j.id = a.job_id WHERE TRUE",
        );

        if let Some(job_id) = filter.job_id {
            builder.push(" AND a.job_id = ").push_bind(job_id);
        }
        if let Some(applicant_id) = filter.applicant_id {
            builder.push(" AND a.applicant_id = ").push_bind(applicant_id);
        }
        if let Some(employer_id) = filter.employer_id {
            builder.push(" AND j.employer_id = ").push_bind(employer_id);
        }
        builder.push(" ORDER BY a.submitted_at DESC, a.id DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter().map(application_from_row).collect()
    }

    async fn update_application_status(
        &self,
        application_id: i64,
        status: &ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let query = format!(
            "UPDATE applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(application_id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("application {}", application_id)))?;

        tracing::debug!("Application {} moved to {}", application_id, status);

        application_from_row(&row)
    }
}
