use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Address, DomainError, JobCategory, JobDetails};

/// Request to publish a new job posting
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(max = 50))]
    #[serde(default, alias = "employment_type")]
    pub employment_type: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "salary_min")]
    pub salary_min: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "salary_max")]
    pub salary_max: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "street_address")]
    pub street_address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 10))]
    #[serde(alias = "postal_code", alias = "zipCode", alias = "zip_code")]
    pub postal_code: String,
}

impl CreateJobRequest {
    pub fn details(&self) -> Result<JobDetails, DomainError> {
        Ok(JobDetails {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            category: self.category.trim().parse()?,
            employment_type: non_empty(self.employment_type.as_deref()),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        })
    }

    pub fn address(&self) -> Address {
        Address::new(
            self.street_address.trim(),
            self.city.trim(),
            self.postal_code.trim(),
        )
    }
}

/// Request to edit a posting; the address is fixed once the posting exists
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(max = 50))]
    #[serde(default, alias = "employment_type")]
    pub employment_type: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "salary_min")]
    pub salary_min: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default, alias = "salary_max")]
    pub salary_max: Option<f64>,
}

impl UpdateJobRequest {
    pub fn details(&self) -> Result<JobDetails, DomainError> {
        Ok(JobDetails {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            category: self.category.trim().parse()?,
            employment_type: non_empty(self.employment_type.as_deref()),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        })
    }
}

/// Query string of the job search endpoint
///
/// `GET /api/v1/jobs/search?keyword=driver&category=transportation&radius=10`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchJobsQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub radius: Option<f64>,
}

/// Request to apply to a posting
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default, alias = "resume_id")]
    pub resume_id: Option<i64>,
    #[validate(length(max = 5000))]
    #[serde(default, alias = "cover_letter")]
    pub cover_letter: Option<String>,
}

/// Request to move an application to another funnel stage
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateApplicationStatusRequest {
    #[validate(length(min = 1, max = 50))]
    pub status: String,
}

/// Request to set the caller's address, used as their search origin
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "street_address", alias = "address")]
    pub street_address: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 10))]
    #[serde(alias = "postal_code", alias = "zipCode", alias = "zip_code")]
    pub postal_code: String,
}

impl UpdateLocationRequest {
    pub fn address(&self) -> Address {
        Address::new(
            self.street_address.trim(),
            self.city.trim(),
            self.postal_code.trim(),
        )
    }
}

/// Trim a value and treat blank input as absent
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateJobRequest {
        serde_json::from_value(serde_json::json!({
            "title": "  Delivery Rider ",
            "description": "Deliver parcels around Ikeja",
            "category": "transportation",
            "employmentType": " ",
            "salaryMin": 80000.0,
            "streetAddress": "12 Allen Avenue",
            "city": "Ikeja",
            "zip_code": "100271"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_request_details() {
        let request = create_request();
        assert!(request.validate().is_ok());

        let details = request.details().unwrap();
        assert_eq!(details.title, "Delivery Rider");
        assert_eq!(details.category, JobCategory::Transportation);
        assert_eq!(details.employment_type, None);
        assert_eq!(details.salary_max, None);
        assert_eq!(request.address().postal_code, "100271");
    }

    #[test]
    fn test_create_request_rejects_unknown_category() {
        let mut request = create_request();
        request.category = "astronaut".to_string();
        assert!(request.details().is_err());
    }

    #[test]
    fn test_create_request_rejects_negative_salary() {
        let mut request = create_request();
        request.salary_min = Some(-1.0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" cook ")), Some("cook".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
