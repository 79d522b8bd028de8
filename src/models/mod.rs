// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Actor, Address, Application, ApplicationStatus, BoundingBox, DomainError, JobCategory,
    JobDetails, JobPosting, JobStatus, Location, NewApplication, NewJobPosting, Role,
    UserLocation,
};
pub use requests::{
    ApplyRequest, CreateJobRequest, SearchJobsQuery, UpdateApplicationStatusRequest,
    UpdateJobRequest, UpdateLocationRequest,
};
pub use responses::{
    ApplicationsResponse, EmployerJobEntry, ErrorResponse, HealthResponse, JobDetailResponse,
    JobMatchView, LocationResponse, SearchJobsResponse,
};
