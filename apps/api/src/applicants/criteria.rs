//! Academic eligibility criteria attached to the active job description.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::student::StudentRow;

/// Degree marks at or below this are read as a 10-point CGPA.
const CGPA_SCALE_MAX: f64 = 10.0;

/// Recruiter thresholds. Unset thresholds admit everyone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicCriteria {
    /// Latest acceptable passing year.
    pub passing_year: Option<i32>,
    /// Minimum 10th percentage.
    pub tenth_marks: Option<f64>,
    /// Minimum 12th percentage.
    pub twelfth_marks: Option<f64>,
    /// Minimum degree marks, percentage or CGPA.
    pub degree_marks: Option<f64>,
}

impl AcademicCriteria {
    pub fn is_empty(&self) -> bool {
        self == &AcademicCriteria::default()
    }

    /// Builds criteria from raw form values; blank values leave a criterion unset.
    pub fn from_form(
        passing_year: Option<&str>,
        tenth_marks: Option<&str>,
        twelfth_marks: Option<&str>,
        degree_marks: Option<&str>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            passing_year: parse_optional("passingYear", passing_year)?,
            tenth_marks: parse_optional("tenthMarks", tenth_marks)?,
            twelfth_marks: parse_optional("twelfthMarks", twelfth_marks)?,
            degree_marks: parse_optional("degreeMarks", degree_marks)?,
        })
    }

    /// Whether the student clears every set threshold. A student value that
    /// cannot be read as a number fails any threshold set on it.
    pub fn admits(&self, student: &StudentRow) -> bool {
        if let Some(max_year) = self.passing_year {
            match student.passing_year.trim().parse::<i32>() {
                Ok(year) if year <= max_year => {}
                _ => return false,
            }
        }

        let at_least = |minimum: Option<f64>, raw: &str, normalize: fn(f64) -> f64| match minimum {
            None => true,
            Some(min) => parse_marks(raw).is_some_and(|v| normalize(v) >= normalize(min)),
        };

        at_least(self.tenth_marks, &student.tenth_marks, identity)
            && at_least(self.twelfth_marks, &student.twelfth_marks, identity)
            && at_least(self.degree_marks, &student.degree_marks, cgpa_to_percentage)
    }
}

fn identity(v: f64) -> f64 {
    v
}

/// 8.2 CGPA compares as 82%.
fn cgpa_to_percentage(v: f64) -> f64 {
    if v <= CGPA_SCALE_MAX {
        v * 10.0
    } else {
        v
    }
}

fn parse_marks(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_optional<T: std::str::FromStr>(field: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .trim_end_matches('%')
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{field} must be a number, got '{value}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn student(year: &str, tenth: &str, twelfth: &str, degree: &str) -> StudentRow {
        StudentRow {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            degree: "B.Tech".to_string(),
            specialization: "CSE".to_string(),
            passing_year: year.to_string(),
            tenth_marks: tenth.to_string(),
            twelfth_marks: twelfth.to_string(),
            degree_marks: degree.to_string(),
            resume_path: "uploads/resumes/asha@example.com.pdf".to_string(),
            status: "Pending".to_string(),
            applied_on: Utc::now(),
        }
    }

    fn criteria() -> AcademicCriteria {
        AcademicCriteria {
            passing_year: Some(2024),
            tenth_marks: Some(75.0),
            twelfth_marks: Some(75.0),
            degree_marks: Some(8.0),
        }
    }

    #[test]
    fn test_empty_criteria_admit_everyone() {
        assert!(AcademicCriteria::default().admits(&student("2030", "x", "", "")));
        assert!(AcademicCriteria::default().is_empty());
    }

    #[test]
    fn test_student_meeting_all_thresholds_is_admitted() {
        assert!(criteria().admits(&student("2024", "88", "79.5%", "8.4")));
    }

    #[test]
    fn test_later_passing_year_is_rejected() {
        assert!(!criteria().admits(&student("2025", "88", "80", "8.4")));
    }

    #[test]
    fn test_degree_marks_normalize_cgpa_against_percentage() {
        // 8.0 CGPA threshold = 80%
        assert!(criteria().admits(&student("2023", "80", "80", "81")));
        assert!(!criteria().admits(&student("2023", "80", "80", "79")));
        assert!(!criteria().admits(&student("2023", "80", "80", "7.9")));

        let percent_threshold = AcademicCriteria {
            degree_marks: Some(70.0),
            ..Default::default()
        };
        assert!(percent_threshold.admits(&student("2023", "", "", "7.2")));
    }

    #[test]
    fn test_unparsable_student_marks_fail_set_threshold() {
        assert!(!criteria().admits(&student("2024", "A+", "80", "8.4")));
    }

    #[test]
    fn test_from_form_parses_and_skips_blanks() {
        let c = AcademicCriteria::from_form(Some("2024"), Some(" 75 "), Some(""), None).unwrap();
        assert_eq!(c.passing_year, Some(2024));
        assert_eq!(c.tenth_marks, Some(75.0));
        assert_eq!(c.twelfth_marks, None);
        assert_eq!(c.degree_marks, None);
    }

    #[test]
    fn test_from_form_rejects_garbage() {
        let err = AcademicCriteria::from_form(Some("next year"), None, None, None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
