use crate::models::{JobPosting, JobStatus};

/// Only active postings are searchable
#[inline]
pub fn is_searchable(posting: &JobPosting) -> bool {
    posting.status == JobStatus::Active
}

/// Case-insensitive substring match against title or description
///
/// `keyword` must already be lowercased; `None` means no keyword filter.
#[inline]
pub fn matches_keyword(posting: &JobPosting, keyword: Option<&str>) -> bool {
    match keyword {
        None => true,
        Some(needle) => {
            posting.title.to_lowercase().contains(needle)
                || posting.description.to_lowercase().contains(needle)
        }
    }
}

/// Exact match against the stored category name; `None` means no category filter
///
/// Names outside the known set simply match nothing.
#[inline]
pub fn matches_category(posting: &JobPosting, category: Option<&str>) -> bool {
    category.map_or(true, |wanted| posting.category.as_str() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, JobCategory, Location};
    use chrono::Utc;

    fn create_posting(title: &str, description: &str, category: JobCategory) -> JobPosting {
        JobPosting {
            id: 1,
            employer_id: 7,
            title: title.to_string(),
            description: description.to_string(),
            category,
            employment_type: None,
            salary_min: None,
            salary_max: None,
            address: Address::new("1 Marina", "Lagos", "101001"),
            location: Location::new(6.5244, 3.3792).unwrap(),
            status: JobStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_keyword_matches_title_or_description() {
        let posting = create_posting("Head Chef", "Run a busy KITCHEN in Yaba", JobCategory::Hospitality);

        assert!(matches_keyword(&posting, Some("chef")));
        assert!(matches_keyword(&posting, Some("kitchen")));
        assert!(matches_keyword(&posting, Some("d ch")));
        assert!(!matches_keyword(&posting, Some("driver")));
        assert!(matches_keyword(&posting, None));
    }

    #[test]
    fn test_category_exact_match() {
        let posting = create_posting("Nurse", "Night shifts", JobCategory::Healthcare);

        assert!(matches_category(&posting, Some("healthcare")));
        assert!(!matches_category(&posting, Some("education")));
        assert!(!matches_category(&posting, Some("Healthcare")));
        assert!(!matches_category(&posting, Some("plumbing")));
        assert!(matches_category(&posting, None));
    }

    #[test]
    fn test_only_active_is_searchable() {
        let mut posting = create_posting("Nurse", "Night shifts", JobCategory::Healthcare);
        assert!(is_searchable(&posting));

        posting.status = JobStatus::Paused;
        assert!(!is_searchable(&posting));

        posting.status = JobStatus::Archived;
        assert!(!is_searchable(&posting));
    }
}
