// Core algorithm exports
pub mod analytics;
pub mod distance;
pub mod filters;
pub mod matcher;

pub use analytics::{compute_snapshot, AnalyticsSnapshot, JobStatusCounts, MonthlyBucket, PopularJob};
pub use distance::{
    calculate_bounding_box, geodesic_distance, haversine_distance, is_within_bounding_box,
    DistanceEngine, DistanceMethod, ServiceArea, ServiceAreaError,
};
pub use filters::{is_searchable, matches_category, matches_keyword};
pub use matcher::{JobMatch, JobMatcher, MatchResult, SearchError, SearchQuery, DEFAULT_RADIUS_KM};
