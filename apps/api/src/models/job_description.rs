use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::applicants::criteria::AcademicCriteria;

/// An uploaded job description. Exactly one row is active at a time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: Uuid,
    pub file_name: String,
    pub original_name: String,
    pub max_passing_year: Option<i32>,
    pub min_tenth_marks: Option<f64>,
    pub min_twelfth_marks: Option<f64>,
    pub min_degree_marks: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl JobDescriptionRow {
    pub fn criteria(&self) -> AcademicCriteria {
        AcademicCriteria {
            passing_year: self.max_passing_year,
            tenth_marks: self.min_tenth_marks,
            twelfth_marks: self.min_twelfth_marks,
            degree_marks: self.min_degree_marks,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewJobDescription {
    pub file_name: String,
    pub original_name: String,
    pub criteria: AcademicCriteria,
}
