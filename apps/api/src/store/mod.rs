//! Persistence for applicants, analyses and job descriptions.
//!
//! `AppState` holds an `Arc<dyn ApplicantStore>`: `PgApplicantStore` in the
//! service, `MemoryApplicantStore` in tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisResultRow, NewAnalysis};
use crate::models::job_description::{JobDescriptionRow, NewJobDescription};
use crate::models::student::{NewStudent, StudentRow, StudentStatus};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgApplicantStore;

pub(crate) const DUPLICATE_EMAIL: &str = "An application with this email already exists";

#[async_trait]
pub trait ApplicantStore: Send + Sync {
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Fails with `AppError::Validation` when the email is already registered.
    async fn insert_student(&self, student: NewStudent) -> Result<StudentRow, AppError>;

    /// All students, newest first.
    async fn list_students(&self) -> Result<Vec<StudentRow>, AppError>;

    /// Students in one status, oldest first.
    async fn list_students_by_status(
        &self,
        status: StudentStatus,
    ) -> Result<Vec<StudentRow>, AppError>;

    /// Removes the student and, by cascade, its analyses.
    async fn delete_student(&self, id: Uuid) -> Result<Option<StudentRow>, AppError>;

    async fn delete_all_students(&self) -> Result<Vec<StudentRow>, AppError>;

    /// Inserts every analysis and flips each student to `Analyzed`, all in one
    /// transaction. Analyses for students that no longer exist are dropped.
    async fn record_analyses(
        &self,
        analyses: Vec<NewAnalysis>,
    ) -> Result<Vec<AnalysisResultRow>, AppError>;

    /// Analyses belonging to the given students, newest first.
    async fn list_analyses_for(
        &self,
        student_ids: &[Uuid],
    ) -> Result<Vec<AnalysisResultRow>, AppError>;

    /// Removes one analysis and resets its student to `Pending`.
    async fn delete_analysis(&self, id: Uuid) -> Result<Option<AnalysisResultRow>, AppError>;

    /// Removes every analysis and resets the affected students. Returns the
    /// number of analyses removed.
    async fn delete_all_analyses(&self) -> Result<u64, AppError>;

    /// Inserts the job description and makes it the only active one.
    async fn activate_job_description(
        &self,
        jd: NewJobDescription,
    ) -> Result<JobDescriptionRow, AppError>;

    async fn active_job_description(&self) -> Result<Option<JobDescriptionRow>, AppError>;
}
