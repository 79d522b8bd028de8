use thiserror::Error;

use crate::core::{
    distance::{calculate_bounding_box, DistanceEngine},
    filters::{is_searchable, matches_category, matches_keyword},
};
use crate::models::{BoundingBox, JobPosting, Location};

/// Radius used when a search does not specify one
pub const DEFAULT_RADIUS_KM: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("radius must be a finite, non-negative number of km (got {0})")]
    InvalidRadius(f64),
}

/// Normalised search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Lowercased keyword; `None` when the caller left it empty
    pub keyword: Option<String>,
    /// Category name as given; `None` when the caller left it empty
    pub category: Option<String>,
    pub radius_km: f64,
}

impl SearchQuery {
    pub fn new(
        keyword: Option<&str>,
        category: Option<&str>,
        radius_km: f64,
    ) -> Result<Self, SearchError> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(SearchError::InvalidRadius(radius_km));
        }

        let keyword = keyword.filter(|k| !k.is_empty()).map(str::to_lowercase);
        let category = category.filter(|c| !c.is_empty()).map(str::to_string);

        Ok(Self {
            keyword,
            category,
            radius_km,
        })
    }

    /// Loose box around the origin for pre-filtering candidates in storage
    pub fn bounding_box(&self, origin: Location) -> BoundingBox {
        calculate_bounding_box(origin, self.radius_km)
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            category: None,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

/// A posting within the search radius
#[derive(Debug, Clone, PartialEq)]
pub struct JobMatch {
    pub posting: JobPosting,
    pub distance_km: f64,
}

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<JobMatch>,
    pub total_candidates: usize,
}

/// Radius search over job postings
///
/// # Pipeline Stages
/// 1. Active postings only
/// 2. Keyword filter (title or description, case-insensitive substring)
/// 3. Category filter (exact)
/// 4. Distance cutoff
/// 5. Stable sort by ascending distance
#[derive(Debug, Clone, Copy)]
pub struct JobMatcher {
    engine: DistanceEngine,
    default_radius_km: f64,
}

impl JobMatcher {
    pub fn new(engine: DistanceEngine) -> Self {
        Self {
            engine,
            default_radius_km: DEFAULT_RADIUS_KM,
        }
    }

    pub fn with_default_radius(mut self, radius_km: f64) -> Self {
        self.default_radius_km = radius_km;
        self
    }

    pub fn engine(&self) -> &DistanceEngine {
        &self.engine
    }

    pub fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    /// Find postings around `origin` matching `query`
    ///
    /// `candidates` are expected in arrival (id) order; postings at equal
    /// distance keep that order in the result.
    pub fn search(
        &self,
        origin: Location,
        query: &SearchQuery,
        candidates: Vec<JobPosting>,
    ) -> MatchResult {
        let total_candidates = candidates.len();
        let keyword = query.keyword.as_deref();

        let mut matches: Vec<JobMatch> = candidates
            .into_iter()
            .filter(is_searchable)
            .filter(|posting| matches_keyword(posting, keyword))
            .filter(|posting| matches_category(posting, query.category.as_deref()))
            .filter_map(|posting| {
                let distance_km = self.engine.distance(origin, posting.location);
                (distance_km <= query.radius_km).then_some(JobMatch {
                    posting,
                    distance_km,
                })
            })
            .collect();

        // sort_by is stable, so ties keep arrival order
        matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        tracing::debug!(
            "Search kept {} of {} candidates within {} km",
            matches.len(),
            total_candidates,
            query.radius_km
        );

        MatchResult {
            matches,
            total_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::{DistanceMethod, ServiceArea};
    use crate::models::{Address, JobCategory, JobStatus};
    use chrono::Utc;

    fn lagos() -> Location {
        Location::new(6.5244, 3.3792).unwrap()
    }

    fn create_matcher() -> JobMatcher {
        let area = ServiceArea::new(lagos(), 50.0).unwrap();
        JobMatcher::new(DistanceEngine::new(area, DistanceMethod::Geodesic))
    }

    fn create_posting(id: i64, title: &str, lat: f64, lon: f64) -> JobPosting {
        JobPosting {
            id,
            employer_id: 100,
            title: title.to_string(),
            description: format!("{} wanted", title),
            category: JobCategory::Retail,
            employment_type: Some("full_time".to_string()),
            salary_min: None,
            salary_max: None,
            address: Address::new("1 Broad Street", "Lagos", "101001"),
            location: Location::new(lat, lon).unwrap(),
            status: JobStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_radius_scenario() {
        let matcher = create_matcher();
        let query = SearchQuery::new(None, None, 10.0).unwrap();

        let candidates = vec![
            create_posting(1, "Far cashier", 6.66, 3.3792), // ~15 km north
            create_posting(2, "Cashier", 6.5244, 3.3792),   // same spot
        ];

        let result = matcher.search(lagos(), &query, candidates);

        assert_eq!(result.total_candidates, 2);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].posting.id, 2);
        assert_eq!(result.matches[0].distance_km, 0.0);
    }

    #[test]
    fn test_sorted_by_distance_with_stable_ties() {
        let matcher = create_matcher();
        let query = SearchQuery::default();

        let candidates = vec![
            create_posting(1, "A", 6.60, 3.3792),
            create_posting(2, "B", 6.55, 3.3792),
            create_posting(3, "C", 6.60, 3.3792),
            create_posting(4, "D", 6.5244, 3.3792),
        ];

        let result = matcher.search(lagos(), &query, candidates);
        let ids: Vec<i64> = result.matches.iter().map(|m| m.posting.id).collect();

        assert_eq!(ids, vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_inactive_postings_excluded() {
        let matcher = create_matcher();
        let mut paused = create_posting(1, "Paused", 6.5244, 3.3792);
        paused.status = JobStatus::Paused;
        let mut archived = create_posting(2, "Archived", 6.5244, 3.3792);
        archived.status = JobStatus::Archived;

        let result = matcher.search(lagos(), &SearchQuery::default(), vec![paused, archived]);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_keyword_and_category_filters() {
        let matcher = create_matcher();
        let mut nurse = create_posting(1, "Night Nurse", 6.53, 3.38);
        nurse.category = JobCategory::Healthcare;
        let cashier = create_posting(2, "Cashier", 6.53, 3.38);

        let query = SearchQuery::new(Some("NURSE"), None, 25.0).unwrap();
        let result = matcher.search(lagos(), &query, vec![nurse.clone(), cashier.clone()]);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].posting.id, 1);

        let query = SearchQuery::new(None, Some("retail"), 25.0).unwrap();
        let result = matcher.search(lagos(), &query, vec![nurse.clone(), cashier.clone()]);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].posting.id, 2);

        let query = SearchQuery::new(None, Some("plumbing"), 25.0).unwrap();
        let result = matcher.search(lagos(), &query, vec![nurse, cashier]);
        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 2);
    }

    #[test]
    fn test_empty_keyword_is_no_filter() {
        let query = SearchQuery::new(Some(""), Some(""), 5.0).unwrap();
        assert_eq!(query.keyword, None);
        assert_eq!(query.category, None);

        // Whitespace is a real substring to look for
        let query = SearchQuery::new(Some(" Chef "), None, 5.0).unwrap();
        assert_eq!(query.keyword.as_deref(), Some(" chef "));
    }

    #[test]
    fn test_whitespace_keyword_still_filters() {
        let matcher = create_matcher();
        let head_chef = create_posting(1, "Head Chef", 6.53, 3.38);
        let mut chef = create_posting(2, "Chef", 6.53, 3.38);
        chef.description = "Grill station".to_string();

        let query = SearchQuery::new(Some(" chef"), None, 25.0).unwrap();
        let result = matcher.search(lagos(), &query, vec![head_chef, chef]);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].posting.id, 1);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        assert!(SearchQuery::new(None, None, -1.0).is_err());
        assert!(SearchQuery::new(None, None, f64::NAN).is_err());
        assert!(SearchQuery::new(None, None, 0.0).is_ok());
    }

    #[test]
    fn test_zero_radius_keeps_only_exact_location() {
        let matcher = create_matcher();
        let query = SearchQuery::new(None, None, 0.0).unwrap();
        let candidates = vec![
            create_posting(1, "Here", 6.5244, 3.3792),
            create_posting(2, "Next door", 6.5245, 3.3792),
        ];

        let result = matcher.search(lagos(), &query, candidates);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].posting.id, 1);
    }
}
