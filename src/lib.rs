//! Local Jobs - location-aware job board service
//!
//! Employers publish postings at geocoded addresses inside a configured service
//! area; job seekers search them by radius around their own saved address, and
//! employers follow their applications through a hiring funnel.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{compute_snapshot, DistanceEngine, JobMatcher, ServiceArea};
pub use models::{Actor, JobPosting, Location, Role};
pub use services::{JobBoard, JobStore, MemoryStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let center = Location::new(6.5244, 3.3792).unwrap();
        let area = ServiceArea::new(center, 50.0).unwrap();
        let engine = DistanceEngine::new(area, Default::default());
        assert!(engine.within_service_area(center));
    }
}
