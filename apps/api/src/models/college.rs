use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Academic program code. Parsed case-insensitively, always serialized uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Course {
    Cse,
    Ece,
    Mech,
}

impl Course {
    pub const ALL: [Course; 3] = [Course::Cse, Course::Ece, Course::Mech];

    pub fn as_str(&self) -> &'static str {
        match self {
            Course::Cse => "CSE",
            Course::Ece => "ECE",
            Course::Mech => "MECH",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCourse(pub String);

impl fmt::Display for UnknownCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid course '{}'. Must be CSE, ECE, or MECH", self.0)
    }
}

impl std::error::Error for UnknownCourse {}

impl FromStr for Course {
    type Err = UnknownCourse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Course::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownCourse(s.trim().to_string()))
    }
}

/// Reference data for one college/course offering.
///
/// Field names on the wire match what existing clients render
/// (`mcet_rank_cutoff`, `intermediate_marks_cutoff`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollegeRecord {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub course: Course,
    /// Largest entrance-exam rank still admitted.
    #[serde(rename = "mcet_rank_cutoff")]
    pub rank_cutoff: i64,
    /// Minimum intermediate percentage admitted.
    #[serde(rename = "intermediate_marks_cutoff")]
    pub marks_cutoff: f64,
    pub fees: Option<f64>,
    pub affiliation: Option<String>,
}

/// Seed-file shape: everything but the id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCollege {
    pub name: String,
    pub location: Option<String>,
    pub course: String,
    pub mcet_rank_cutoff: i64,
    pub intermediate_marks_cutoff: f64,
    pub fees: Option<f64>,
    pub affiliation: Option<String>,
}

impl TryFrom<NewCollege> for CollegeRecord {
    type Error = anyhow::Error;

    fn try_from(new: NewCollege) -> Result<Self, Self::Error> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            anyhow::bail!("college name must not be empty");
        }
        let course: Course = new.course.parse()?;
        if new.mcet_rank_cutoff < 0 {
            anyhow::bail!("{name}: mcet_rank_cutoff must be non-negative");
        }
        if !(0.0..=100.0).contains(&new.intermediate_marks_cutoff) {
            anyhow::bail!("{name}: intermediate_marks_cutoff must be within 0-100");
        }
        if new.fees.is_some_and(|f| f < 0.0) {
            anyhow::bail!("{name}: fees must be non-negative");
        }

        Ok(CollegeRecord {
            id: Uuid::new_v4(),
            name,
            location: trimmed(new.location),
            course,
            rank_cutoff: new.mcet_rank_cutoff,
            marks_cutoff: new.intermediate_marks_cutoff,
            fees: new.fees,
            affiliation: trimmed(new.affiliation),
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Row shape of the `colleges` table.
#[derive(Debug, Clone, FromRow)]
pub struct CollegeRow {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub course: String,
    pub mcet_rank_cutoff: i64,
    pub intermediate_marks_cutoff: f64,
    pub fees: Option<f64>,
    pub affiliation: Option<String>,
}

impl TryFrom<CollegeRow> for CollegeRecord {
    type Error = UnknownCourse;

    fn try_from(row: CollegeRow) -> Result<Self, Self::Error> {
        Ok(CollegeRecord {
            id: row.id,
            name: row.name,
            location: row.location,
            course: row.course.parse()?,
            rank_cutoff: row.mcet_rank_cutoff,
            marks_cutoff: row.intermediate_marks_cutoff,
            fees: row.fees,
            affiliation: row.affiliation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_college(course: &str, rank: i64, marks: f64) -> NewCollege {
        NewCollege {
            name: "  Vasavi College of Engineering ".into(),
            location: Some(" Hyderabad ".into()),
            course: course.into(),
            mcet_rank_cutoff: rank,
            intermediate_marks_cutoff: marks,
            fees: Some(120000.0),
            affiliation: Some("".into()),
        }
    }

    #[test]
    fn test_course_parse_is_case_insensitive() {
        assert_eq!("cse".parse::<Course>().unwrap(), Course::Cse);
        assert_eq!(" Ece ".parse::<Course>().unwrap(), Course::Ece);
        assert_eq!("MECH".parse::<Course>().unwrap(), Course::Mech);
    }

    #[test]
    fn test_course_parse_rejects_unknown() {
        let err = "civil".parse::<Course>().unwrap_err();
        assert!(err.to_string().contains("civil"));
    }

    #[test]
    fn test_record_serializes_wire_names() {
        let record = CollegeRecord::try_from(new_college("cse", 6000, 80.0)).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["course"], "CSE");
        assert_eq!(json["mcet_rank_cutoff"], 6000);
        assert_eq!(json["intermediate_marks_cutoff"], 80.0);
        assert!(json.get("rank_cutoff").is_none());
    }

    #[test]
    fn test_new_college_is_trimmed() {
        let record = CollegeRecord::try_from(new_college("ECE", 100, 60.0)).unwrap();
        assert_eq!(record.name, "Vasavi College of Engineering");
        assert_eq!(record.location.as_deref(), Some("Hyderabad"));
        assert_eq!(record.affiliation, None);
    }

    #[test]
    fn test_new_college_rejects_out_of_range() {
        assert!(CollegeRecord::try_from(new_college("CSE", -1, 60.0)).is_err());
        assert!(CollegeRecord::try_from(new_college("CSE", 10, 101.0)).is_err());
        assert!(CollegeRecord::try_from(new_college("CIVIL", 10, 50.0)).is_err());
    }
}
