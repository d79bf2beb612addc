use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of an application: created `Pending`, flipped to `Analyzed` by the
/// batch trigger, reset to `Pending` when its analyses are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentStatus {
    Pending,
    Analyzed,
}

impl StudentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentStatus::Pending => "Pending",
            StudentStatus::Analyzed => "Analyzed",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub degree: String,
    pub specialization: String,
    pub passing_year: String,
    pub tenth_marks: String,
    pub twelfth_marks: String,
    pub degree_marks: String,
    pub resume_path: String,
    pub status: String,
    pub applied_on: DateTime<Utc>,
}

impl StudentRow {
    /// File name under the resume directory, as served by `GET /resume/:filename`.
    pub fn resume_file_name(&self) -> Option<&str> {
        std::path::Path::new(&self.resume_path)
            .file_name()
            .and_then(|n| n.to_str())
    }
}

/// Validated application ready for insertion.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub degree: String,
    pub specialization: String,
    pub passing_year: String,
    pub tenth_marks: String,
    pub twelfth_marks: String,
    pub degree_marks: String,
    pub resume_path: String,
}
