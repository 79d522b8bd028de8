use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Application, JobPosting, JobStatus};

/// Number of submission months kept in the monthly breakdown
pub const MONTHLY_BUCKET_LIMIT: usize = 6;

/// Title reported as the most popular job when the employer has no postings
pub const NO_POPULAR_JOB: &str = "None";

/// Point-in-time hiring funnel metrics for one employer
///
/// Recomputed from current rows on every request; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_jobs: usize,
    pub total_applications: usize,
    pub acceptance_rate: f64,
    pub interview_rate: f64,
    pub rejection_rate: f64,
    pub response_rate: f64,
    /// Newest month first
    pub monthly_buckets: Vec<MonthlyBucket>,
    /// Keyed by the raw status value
    pub status_buckets: BTreeMap<String, usize>,
    pub avg_response_time_days: f64,
    pub most_popular_job: PopularJob,
    pub job_status_counts: JobStatusCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    /// e.g. "March 2025"
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularJob {
    pub title: String,
    pub application_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusCounts {
    pub active: usize,
    pub paused: usize,
    pub archived: usize,
}

#[derive(Default)]
struct FunnelTally {
    total: usize,
    accepted: usize,
    interview: usize,
    rejected: usize,
    responded: usize,
    response_days_sum: i64,
    by_month: BTreeMap<(i32, u32), usize>,
    by_status: BTreeMap<String, usize>,
    by_job: HashMap<i64, usize>,
}

impl FunnelTally {
    fn record(&mut self, application: &Application) {
        use crate::models::ApplicationStatus::*;

        self.total += 1;
        match application.status {
            Accepted => self.accepted += 1,
            Interview => self.interview += 1,
            Rejected => self.rejected += 1,
            _ => {}
        }

        if application.status.is_responded() {
            self.responded += 1;
            // Whole days, like a calendar countdown; clock skew never goes negative
            let days = (application.updated_at - application.submitted_at).num_days();
            self.response_days_sum += days.max(0);
        }

        let submitted = application.submitted_at;
        *self
            .by_month
            .entry((submitted.year(), submitted.month()))
            .or_insert(0) += 1;
        *self
            .by_status
            .entry(application.status.as_str().to_string())
            .or_insert(0) += 1;
        *self.by_job.entry(application.job_id).or_insert(0) += 1;
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        round_one(count as f64 / self.total as f64 * 100.0)
    }

    fn avg_response_days(&self) -> f64 {
        if self.responded == 0 {
            return 0.0;
        }
        round_one(self.response_days_sum as f64 / self.responded as f64)
    }

    fn monthly_buckets(&self) -> Vec<MonthlyBucket> {
        self.by_month
            .iter()
            .rev()
            .take(MONTHLY_BUCKET_LIMIT)
            .map(|(&(year, month), &count)| MonthlyBucket {
                year,
                month,
                label: month_label(year, month),
                count,
            })
            .collect()
    }
}

/// Aggregate an employer's postings and applications into an [`AnalyticsSnapshot`]
///
/// `postings` are the employer's postings; applications to any other posting are ignored.
/// A single pass over `applications` feeds every metric.
pub fn compute_snapshot(postings: &[JobPosting], applications: &[Application]) -> AnalyticsSnapshot {
    let owned: HashMap<i64, &JobPosting> = postings.iter().map(|p| (p.id, p)).collect();

    let mut tally = FunnelTally::default();
    for application in applications.iter().filter(|a| owned.contains_key(&a.job_id)) {
        tally.record(application);
    }

    let mut job_status_counts = JobStatusCounts::default();
    for posting in postings {
        match posting.status {
            JobStatus::Active => job_status_counts.active += 1,
            JobStatus::Paused => job_status_counts.paused += 1,
            JobStatus::Archived => job_status_counts.archived += 1,
        }
    }

    AnalyticsSnapshot {
        total_jobs: postings.len(),
        total_applications: tally.total,
        acceptance_rate: tally.rate(tally.accepted),
        interview_rate: tally.rate(tally.interview),
        rejection_rate: tally.rate(tally.rejected),
        response_rate: tally.rate(tally.responded),
        monthly_buckets: tally.monthly_buckets(),
        status_buckets: tally.by_status.clone(),
        avg_response_time_days: tally.avg_response_days(),
        most_popular_job: most_popular(postings, &tally.by_job),
        job_status_counts,
    }
}

/// Highest application count wins; ties go to the lowest posting id
fn most_popular(postings: &[JobPosting], by_job: &HashMap<i64, usize>) -> PopularJob {
    postings
        .iter()
        .map(|p| (p, by_job.get(&p.id).copied().unwrap_or(0)))
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then(b.id.cmp(&a.id)))
        .map(|(posting, count)| PopularJob {
            title: posting.title.clone(),
            application_count: count,
        })
        .unwrap_or_else(|| PopularJob {
            title: NO_POPULAR_JOB.to_string(),
            application_count: 0,
        })
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{:02}/{}", month, year))
}

/// Percentages and averages are reported to one decimal place
#[inline]
pub fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
