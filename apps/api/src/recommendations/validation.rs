use serde::Deserialize;
use serde_json::Value;

use crate::models::college::Course;
use crate::recommendations::matching::RecommendationQuery;

/// Raw recommendation request body.
///
/// Clients post `rank`/`marks`/`course`, the older
/// `mcet_rank`/`intermediate_marks`/`desired_course`, the camelCase
/// `mcetRank`/`intermediateMarks`/`desiredCourse`, or several at once.
/// Each spelling is its own field so a body carrying two of them still parses.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationRequest {
    pub rank: Option<Value>,
    pub marks: Option<Value>,
    pub course: Option<Value>,

    pub mcet_rank: Option<Value>,
    pub intermediate_marks: Option<Value>,
    pub desired_course: Option<Value>,

    #[serde(rename = "mcetRank")]
    pub mcet_rank_camel: Option<Value>,
    #[serde(rename = "intermediateMarks")]
    pub intermediate_marks_camel: Option<Value>,
    #[serde(rename = "desiredCourse")]
    pub desired_course_camel: Option<Value>,
}

impl RecommendationRequest {
    fn rank_value(&self) -> Option<&Value> {
        first_present([&self.rank, &self.mcet_rank, &self.mcet_rank_camel])
    }

    fn marks_value(&self) -> Option<&Value> {
        first_present([
            &self.marks,
            &self.intermediate_marks,
            &self.intermediate_marks_camel,
        ])
    }

    fn course_value(&self) -> Option<&Value> {
        first_present([
            &self.course,
            &self.desired_course,
            &self.desired_course_camel,
        ])
    }
}

/// Why a request could not become a [`RecommendationQuery`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be a number")]
    NotNumeric(&'static str),

    #[error("rank must be a positive whole number")]
    InvalidRank,

    #[error("marks must be between 0 and 100")]
    MarksOutOfRange,

    #[error("course must be a string")]
    CourseNotString,

    #[error("{0}")]
    UnknownCourse(String),
}

/// Validates every field before building the query; nothing is applied on failure.
pub fn validate_query(req: &RecommendationRequest) -> Result<RecommendationQuery, QueryError> {
    let rank = numeric_field("rank", req.rank_value())?;
    let marks = numeric_field("marks", req.marks_value())?;
    let course = course_field(req.course_value())?;

    if rank.fract() != 0.0 || rank < 1.0 || rank >= i64::MAX as f64 {
        return Err(QueryError::InvalidRank);
    }
    if !(0.0..=100.0).contains(&marks) {
        return Err(QueryError::MarksOutOfRange);
    }

    Ok(RecommendationQuery {
        rank: rank as i64,
        marks,
        course,
    })
}

fn first_present<const N: usize>(candidates: [&Option<Value>; N]) -> Option<&Value> {
    candidates
        .into_iter()
        .filter_map(Option::as_ref)
        .find(|v| !is_blank(v))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn numeric_field(name: &'static str, value: Option<&Value>) -> Result<f64, QueryError> {
    let value = value.ok_or(QueryError::Missing(name))?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or(QueryError::NotNumeric(name))
}

fn course_field(value: Option<&Value>) -> Result<Course, QueryError> {
    let value = value.ok_or(QueryError::Missing("course"))?;
    let raw = value.as_str().ok_or(QueryError::CourseNotString)?;
    raw.parse::<Course>()
        .map_err(|e| QueryError::UnknownCourse(e.to_string()))
}
