use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when a value entering the system fails validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("unknown job category: {0}")]
    UnknownCategory(String),

    #[error("unknown job status: {0}")]
    UnknownJobStatus(String),

    #[error("unknown application status: {0}")]
    UnknownApplicationStatus(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("cannot change status of an archived job")]
    ArchivedJob,
}

/// A resolved geographic position
///
/// Both coordinates are always present together. An address that could not be
/// resolved is represented by the absence of a `Location`, never by a partial one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting non-finite or out-of-range coordinates
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if valid {
            Ok(Self { latitude, longitude })
        } else {
            Err(DomainError::InvalidCoordinates { latitude, longitude })
        }
    }

    /// Combine optional coordinates, yielding `None` unless both are present and valid
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).ok(),
            _ => None,
        }
    }
}

/// Free-text postal address as entered by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Single-line form sent to the geocoding provider
    pub fn one_line(&self) -> String {
        format!("{}, {}, {}", self.street, self.city, self.postal_code)
    }
}

/// Account role supplied by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    JobSeeker,
    Employer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "job_seeker",
            Role::Employer => "employer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job_seeker" => Ok(Role::JobSeeker),
            "employer" => Ok(Role::Employer),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated caller of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Lifecycle status of a job posting
///
/// `Archived` is terminal: once a posting is archived no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Paused,
    Archived,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Archived => "archived",
        }
    }

    /// Pause an active posting or reactivate a paused one
    pub fn toggled(self) -> Result<Self, DomainError> {
        match self {
            JobStatus::Active => Ok(JobStatus::Paused),
            JobStatus::Paused => Ok(JobStatus::Active),
            JobStatus::Archived => Err(DomainError::ArchivedJob),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(JobStatus::Active),
            "paused" => Ok(JobStatus::Paused),
            "archived" => Ok(JobStatus::Archived),
            other => Err(DomainError::UnknownJobStatus(other.to_string())),
        }
    }
}

/// Job category offered on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    Retail,
    Hospitality,
    Construction,
    Healthcare,
    Education,
    Technology,
    Transportation,
    Administrative,
    Domestic,
    Other,
}

impl JobCategory {
    pub const ALL: [JobCategory; 10] = [
        JobCategory::Retail,
        JobCategory::Hospitality,
        JobCategory::Construction,
        JobCategory::Healthcare,
        JobCategory::Education,
        JobCategory::Technology,
        JobCategory::Transportation,
        JobCategory::Administrative,
        JobCategory::Domestic,
        JobCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobCategory::Retail => "retail",
            JobCategory::Hospitality => "hospitality",
            JobCategory::Construction => "construction",
            JobCategory::Healthcare => "healthcare",
            JobCategory::Education => "education",
            JobCategory::Technology => "technology",
            JobCategory::Transportation => "transportation",
            JobCategory::Administrative => "administrative",
            JobCategory::Domestic => "domestic",
            JobCategory::Other => "other",
        }
    }

    /// Lenient conversion for values read back from storage
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!("Unrecognised stored job category {:?}, treating as other", value);
            JobCategory::Other
        })
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// Where an application sits in the hiring funnel
///
/// Requests may only set one of the known stages. Rows read back from storage keep
/// whatever value they hold so analytics can still group them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Applied,
    Reviewed,
    Interview,
    Accepted,
    Rejected,
    Unknown(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Unknown(raw) => raw,
        }
    }

    /// Strict parse used where a status enters the system
    pub fn parse_known(value: &str) -> Result<Self, DomainError> {
        match Self::from_stored(value) {
            ApplicationStatus::Unknown(raw) => Err(DomainError::UnknownApplicationStatus(raw)),
            known => Ok(known),
        }
    }

    /// Lenient parse for stored rows, keeping unrecognised values verbatim
    pub fn from_stored(value: &str) -> Self {
        match value {
            "applied" => ApplicationStatus::Applied,
            "reviewed" => ApplicationStatus::Reviewed,
            "interview" => ApplicationStatus::Interview,
            "accepted" => ApplicationStatus::Accepted,
            "rejected" => ApplicationStatus::Rejected,
            other => ApplicationStatus::Unknown(other.to_string()),
        }
    }

    /// An application has been responded to once it leaves the initial stage
    pub fn is_responded(&self) -> bool {
        !matches!(self, ApplicationStatus::Applied)
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Applied
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ApplicationStatus {
    fn from(value: String) -> Self {
        Self::from_stored(&value)
    }
}

impl From<ApplicationStatus> for String {
    fn from(value: ApplicationStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Editable fields of a job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub title: String,
    pub description: String,
    pub category: JobCategory,
    pub employment_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

/// A job posting with its geocoded location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: i64,
    pub employer_id: i64,
    pub title: String,
    pub description: String,
    pub category: JobCategory,
    pub employment_type: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub address: Address,
    pub location: Location,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    pub fn details(&self) -> JobDetails {
        JobDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            employment_type: self.employment_type.clone(),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        }
    }

    pub fn apply_details(&mut self, details: &JobDetails) {
        self.title = details.title.clone();
        self.description = details.description.clone();
        self.category = details.category;
        self.employment_type = details.employment_type.clone();
        self.salary_min = details.salary_min;
        self.salary_max = details.salary_max;
    }
}

/// Posting about to be persisted; its location has already passed the service-area check
#[derive(Debug, Clone, PartialEq)]
pub struct NewJobPosting {
    pub employer_id: i64,
    pub details: JobDetails,
    pub address: Address,
    pub location: Location,
}

/// A seeker's application to a posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub job_id: i64,
    pub applicant_id: i64,
    pub resume_id: Option<i64>,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub job_id: i64,
    pub applicant_id: i64,
    pub resume_id: Option<i64>,
    pub cover_letter: Option<String>,
}

/// A user's saved address and its coordinates, used as the search origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    pub user_id: i64,
    pub address: Address,
    pub location: Location,
    pub updated_at: DateTime<Utc>,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_requires_valid_range() {
        assert!(Location::new(6.5244, 3.3792).is_ok());
        assert!(Location::new(91.0, 0.0).is_err());
        assert!(Location::new(0.0, -180.5).is_err());
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_location_from_parts_is_all_or_nothing() {
        assert_eq!(
            Location::from_parts(Some(6.5), Some(3.3)),
            Some(Location { latitude: 6.5, longitude: 3.3 })
        );
        assert_eq!(Location::from_parts(Some(6.5), None), None);
        assert_eq!(Location::from_parts(None, Some(3.3)), None);
    }

    #[test]
    fn test_archived_is_terminal() {
        assert_eq!(JobStatus::Active.toggled(), Ok(JobStatus::Paused));
        assert_eq!(JobStatus::Paused.toggled(), Ok(JobStatus::Active));
        assert_eq!(JobStatus::Archived.toggled(), Err(DomainError::ArchivedJob));
    }

    #[test]
    fn test_application_status_boundary() {
        assert_eq!(
            ApplicationStatus::parse_known("interview"),
            Ok(ApplicationStatus::Interview)
        );
        assert!(ApplicationStatus::parse_known("shortlisted").is_err());

        let stored = ApplicationStatus::from_stored("shortlisted");
        assert_eq!(stored, ApplicationStatus::Unknown("shortlisted".to_string()));
        assert_eq!(stored.as_str(), "shortlisted");
        assert!(stored.is_responded());
        assert!(!ApplicationStatus::Applied.is_responded());
    }

    #[test]
    fn test_application_status_serializes_as_string() {
        let json = serde_json::to_string(&ApplicationStatus::Accepted).unwrap();
        assert_eq!(json, "\"accepted\"");

        let parsed: ApplicationStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Unknown("on_hold".to_string()));
    }

    #[test]
    fn test_category_round_trip_names() {
        for category in JobCategory::ALL {
            assert_eq!(category.as_str().parse::<JobCategory>(), Ok(category));
        }
        assert!("plumbing".parse::<JobCategory>().is_err());
        assert_eq!(JobCategory::from_stored("plumbing"), JobCategory::Other);
    }

    #[test]
    fn test_address_one_line() {
        let address = Address::new("12 Allen Avenue", "Ikeja", "100271");
        assert_eq!(address.one_line(), "12 Allen Avenue, Ikeja, 100271");
    }
}
