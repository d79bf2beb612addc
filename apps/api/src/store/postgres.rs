use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisResultRow, NewAnalysis};
use crate::models::job_description::{JobDescriptionRow, NewJobDescription};
use crate::models::student::{NewStudent, StudentRow, StudentStatus};
use crate::store::{ApplicantStore, DUPLICATE_EMAIL};

#[derive(Clone)]
pub struct PgApplicantStore {
    pool: PgPool,
}

impl PgApplicantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicantStore for PgApplicantStore {
    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert_student(&self, student: NewStudent) -> Result<StudentRow, AppError> {
        let result = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students
                (id, name, email, phone, degree, specialization, passing_year,
                 tenth_marks, twelfth_marks, degree_marks, resume_path, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(&student.degree)
        .bind(&student.specialization)
        .bind(&student.passing_year)
        .bind(&student.tenth_marks)
        .bind(&student.twelfth_marks)
        .bind(&student.degree_marks)
        .bind(&student.resume_path)
        .bind(StudentStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            // The unique constraint settles concurrent submissions for the same email.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::Validation(DUPLICATE_EMAIL.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, AppError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            "SELECT * FROM students ORDER BY applied_on DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_students_by_status(
        &self,
        status: StudentStatus,
    ) -> Result<Vec<StudentRow>, AppError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            "SELECT * FROM students WHERE status = $1 ORDER BY applied_on, id",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_student(&self, id: Uuid) -> Result<Option<StudentRow>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>("DELETE FROM students WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_all_students(&self) -> Result<Vec<StudentRow>, AppError> {
        let rows = sqlx::query_as::<_, StudentRow>("DELETE FROM students RETURNING *")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn record_analyses(
        &self,
        analyses: Vec<NewAnalysis>,
    ) -> Result<Vec<AnalysisResultRow>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut recorded = Vec::with_capacity(analyses.len());

        for analysis in analyses {
            // A student deleted while the batch ran is skipped, not a FK failure.
            let row = sqlx::query_as::<_, AnalysisResultRow>(
                r#"
                INSERT INTO analysis_results
                    (id, student_id, job_description_id, final_weighted_score, fit_verdict,
                     hard_match_score, llm_relevance_score, missing_elements,
                     personalized_feedback, summary_for_recruiter)
                SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
                WHERE EXISTS (SELECT 1 FROM students WHERE id = $2 FOR KEY SHARE)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(analysis.student_id)
            .bind(analysis.job_description_id)
            .bind(analysis.final_weighted_score)
            .bind(&analysis.fit_verdict)
            .bind(analysis.hard_match_score)
            .bind(analysis.llm_relevance_score)
            .bind(&analysis.missing_elements)
            .bind(&analysis.personalized_feedback)
            .bind(&analysis.summary_for_recruiter)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(row) = row else {
                warn!(
                    "Student {} no longer exists, dropping its analysis",
                    analysis.student_id
                );
                continue;
            };

            sqlx::query("UPDATE students SET status = $1 WHERE id = $2")
                .bind(StudentStatus::Analyzed.as_str())
                .bind(analysis.student_id)
                .execute(&mut *tx)
                .await?;

            recorded.push(row);
        }

        tx.commit().await?;
        info!("Recorded {} analyses", recorded.len());
        Ok(recorded)
    }

    async fn list_analyses_for(
        &self,
        student_ids: &[Uuid],
    ) -> Result<Vec<AnalysisResultRow>, AppError> {
        let rows = sqlx::query_as::<_, AnalysisResultRow>(
            "SELECT * FROM analysis_results WHERE student_id = ANY($1) ORDER BY created_at DESC, id",
        )
        .bind(student_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_analysis(&self, id: Uuid) -> Result<Option<AnalysisResultRow>, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query_as::<_, AnalysisResultRow>(
            "DELETE FROM analysis_results WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(analysis) = &deleted {
            sqlx::query("UPDATE students SET status = $1 WHERE id = $2")
                .bind(StudentStatus::Pending.as_str())
                .bind(analysis.student_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(deleted)
    }

    async fn delete_all_analyses(&self) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE students SET status = $1 WHERE id IN (SELECT DISTINCT student_id FROM analysis_results)",
        )
        .bind(StudentStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;

        let removed = sqlx::query("DELETE FROM analysis_results")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(removed)
    }

    async fn activate_job_description(
        &self,
        jd: NewJobDescription,
    ) -> Result<JobDescriptionRow, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE job_descriptions SET is_active = FALSE WHERE is_active")
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, JobDescriptionRow>(
            r#"
            INSERT INTO job_descriptions
                (id, file_name, original_name, max_passing_year, min_tenth_marks,
                 min_twelfth_marks, min_degree_marks, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&jd.file_name)
        .bind(&jd.original_name)
        .bind(jd.criteria.passing_year)
        .bind(jd.criteria.tenth_marks)
        .bind(jd.criteria.twelfth_marks)
        .bind(jd.criteria.degree_marks)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Activated job description {} ({})", row.id, row.file_name);
        Ok(row)
    }

    async fn active_job_description(&self) -> Result<Option<JobDescriptionRow>, AppError> {
        let row = sqlx::query_as::<_, JobDescriptionRow>(
            "SELECT * FROM job_descriptions WHERE is_active LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
