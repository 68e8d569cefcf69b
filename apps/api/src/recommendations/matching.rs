//! Recommendation matching: a pure filter-and-sort over college reference data.
//!
//! A college qualifies when it offers the requested course, its rank cutoff is
//! at least the applicant's rank (a larger cutoff admits weaker ranks), and its
//! marks cutoff is at most the applicant's marks. Qualifying colleges are
//! ordered by ascending rank cutoff, so the most competitive college the
//! applicant still clears comes first.

use std::cmp::Ordering;

use crate::models::college::{CollegeRecord, Course};

/// A validated recommendation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationQuery {
    pub rank: i64,
    pub marks: f64,
    pub course: Course,
}

/// The qualification predicate in a form storage backends can push down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollegeFilter {
    pub course: Course,
    pub min_rank_cutoff: i64,
    pub max_marks_cutoff: f64,
}

impl From<&RecommendationQuery> for CollegeFilter {
    fn from(query: &RecommendationQuery) -> Self {
        CollegeFilter {
            course: query.course,
            min_rank_cutoff: query.rank,
            max_marks_cutoff: query.marks,
        }
    }
}

impl CollegeFilter {
    pub fn matches(&self, college: &CollegeRecord) -> bool {
        college.course == self.course
            && college.rank_cutoff >= self.min_rank_cutoff
            && college.marks_cutoff <= self.max_marks_cutoff
    }
}

/// Best-match-first: ascending rank cutoff, then name.
pub fn best_match_order(a: &CollegeRecord, b: &CollegeRecord) -> Ordering {
    a.rank_cutoff
        .cmp(&b.rank_cutoff)
        .then_with(|| a.name.cmp(&b.name))
}

/// Returns every college `query` qualifies for, best match first.
/// The input is left untouched; an empty result is a valid answer.
pub fn match_colleges(query: &RecommendationQuery, colleges: &[CollegeRecord]) -> Vec<CollegeRecord> {
    let filter = CollegeFilter::from(query);
    let mut matched: Vec<CollegeRecord> = colleges
        .iter()
        .filter(|c| filter.matches(c))
        .cloned()
        .collect();
    matched.sort_by(best_match_order);
    matched
}
