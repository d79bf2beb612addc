//! In-memory `ApplicantStore` mirroring the Postgres semantics, for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{AnalysisResultRow, NewAnalysis};
use crate::models::job_description::{JobDescriptionRow, NewJobDescription};
use crate::models::student::{NewStudent, StudentRow, StudentStatus};
use crate::store::{ApplicantStore, DUPLICATE_EMAIL};

#[derive(Default)]
struct Tables {
    students: Vec<StudentRow>,
    analyses: Vec<AnalysisResultRow>,
    job_descriptions: Vec<JobDescriptionRow>,
    /// Monotonic clock so ordering by timestamp is deterministic.
    ticks: i64,
}

impl Tables {
    fn now(&mut self) -> chrono::DateTime<Utc> {
        self.ticks += 1;
        Utc::now() + Duration::milliseconds(self.ticks)
    }

    fn set_status(&mut self, student_id: Uuid, status: StudentStatus) {
        if let Some(s) = self.students.iter_mut().find(|s| s.id == student_id) {
            s.status = status.as_str().to_string();
        }
    }
}

#[derive(Default)]
pub struct MemoryApplicantStore {
    tables: Mutex<Tables>,
}

impl MemoryApplicantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student_count(&self) -> usize {
        self.tables.lock().unwrap().students.len()
    }

    pub fn analysis_count(&self) -> usize {
        self.tables.lock().unwrap().analyses.len()
    }
}

#[async_trait]
impl ApplicantStore for MemoryApplicantStore {
    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .students
            .iter()
            .any(|s| s.email == email))
    }

    async fn insert_student(&self, student: NewStudent) -> Result<StudentRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.students.iter().any(|s| s.email == student.email) {
            return Err(AppError::Validation(DUPLICATE_EMAIL.to_string()));
        }
        let applied_on = tables.now();
        let row = StudentRow {
            id: Uuid::new_v4(),
            name: student.name,
            email: student.email,
            phone: student.phone,
            degree: student.degree,
            specialization: student.specialization,
            passing_year: student.passing_year,
            tenth_marks: student.tenth_marks,
            twelfth_marks: student.twelfth_marks,
            degree_marks: student.degree_marks,
            resume_path: student.resume_path,
            status: StudentStatus::Pending.as_str().to_string(),
            applied_on,
        };
        tables.students.push(row.clone());
        Ok(row)
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, AppError> {
        let mut rows = self.tables.lock().unwrap().students.clone();
        rows.sort_by(|a, b| b.applied_on.cmp(&a.applied_on));
        Ok(rows)
    }

    async fn list_students_by_status(
        &self,
        status: StudentStatus,
    ) -> Result<Vec<StudentRow>, AppError> {
        let mut rows: Vec<StudentRow> = self
            .tables
            .lock()
            .unwrap()
            .students
            .iter()
            .filter(|s| s.status == status.as_str())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.applied_on.cmp(&b.applied_on));
        Ok(rows)
    }

    async fn delete_student(&self, id: Uuid) -> Result<Option<StudentRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(pos) = tables.students.iter().position(|s| s.id == id) else {
            return Ok(None);
        };
        let removed = tables.students.remove(pos);
        tables.analyses.retain(|a| a.student_id != id);
        Ok(Some(removed))
    }

    async fn delete_all_students(&self) -> Result<Vec<StudentRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        tables.analyses.clear();
        Ok(std::mem::take(&mut tables.students))
    }

    async fn record_analyses(
        &self,
        analyses: Vec<NewAnalysis>,
    ) -> Result<Vec<AnalysisResultRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let mut recorded = Vec::with_capacity(analyses.len());
        for analysis in analyses {
            if !tables.students.iter().any(|s| s.id == analysis.student_id) {
                continue;
            }
            let created_at = tables.now();
            let row = AnalysisResultRow {
                id: Uuid::new_v4(),
                student_id: analysis.student_id,
                job_description_id: analysis.job_description_id,
                final_weighted_score: analysis.final_weighted_score,
                fit_verdict: analysis.fit_verdict,
                hard_match_score: analysis.hard_match_score,
                llm_relevance_score: analysis.llm_relevance_score,
                missing_elements: analysis.missing_elements,
                personalized_feedback: analysis.personalized_feedback,
                summary_for_recruiter: analysis.summary_for_recruiter,
                created_at,
            };
            tables.set_status(row.student_id, StudentStatus::Analyzed);
            tables.analyses.push(row.clone());
            recorded.push(row);
        }
        Ok(recorded)
    }

    async fn list_analyses_for(
        &self,
        student_ids: &[Uuid],
    ) -> Result<Vec<AnalysisResultRow>, AppError> {
        let mut rows: Vec<AnalysisResultRow> = self
            .tables
            .lock()
            .unwrap()
            .analyses
            .iter()
            .filter(|a| student_ids.contains(&a.student_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn delete_analysis(&self, id: Uuid) -> Result<Option<AnalysisResultRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(pos) = tables.analyses.iter().position(|a| a.id == id) else {
            return Ok(None);
        };
        let removed = tables.analyses.remove(pos);
        tables.set_status(removed.student_id, StudentStatus::Pending);
        Ok(Some(removed))
    }

    async fn delete_all_analyses(&self) -> Result<u64, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let removed = std::mem::take(&mut tables.analyses);
        for analysis in &removed {
            tables.set_status(analysis.student_id, StudentStatus::Pending);
        }
        Ok(removed.len() as u64)
    }

    async fn activate_job_description(
        &self,
        jd: NewJobDescription,
    ) -> Result<JobDescriptionRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        for existing in tables.job_descriptions.iter_mut() {
            existing.is_active = false;
        }
        let created_at = tables.now();
        let row = JobDescriptionRow {
            id: Uuid::new_v4(),
            file_name: jd.file_name,
            original_name: jd.original_name,
            max_passing_year: jd.criteria.passing_year,
            min_tenth_marks: jd.criteria.tenth_marks,
            min_twelfth_marks: jd.criteria.twelfth_marks,
            min_degree_marks: jd.criteria.degree_marks,
            is_active: true,
            created_at,
        };
        tables.job_descriptions.push(row.clone());
        Ok(row)
    }

    async fn active_job_description(&self) -> Result<Option<JobDescriptionRow>, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .job_descriptions
            .iter()
            .find(|jd| jd.is_active)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_student(email: &str) -> NewStudent {
        NewStudent {
            name: "Asha".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            degree: "B.Tech".to_string(),
            specialization: "CSE".to_string(),
            passing_year: "2024".to_string(),
            tenth_marks: "90".to_string(),
            twelfth_marks: "85".to_string(),
            degree_marks: "8.1".to_string(),
            resume_path: format!("uploads/resumes/{email}.pdf"),
        }
    }

    fn analysis_for(student_id: Uuid) -> NewAnalysis {
        NewAnalysis {
            student_id,
            job_description_id: None,
            final_weighted_score: 86.0,
            fit_verdict: "High Suitability".to_string(),
            hard_match_score: 80.0,
            llm_relevance_score: 90.0,
            missing_elements: vec!["Docker".to_string()],
            personalized_feedback: String::new(),
            summary_for_recruiter: String::new(),
        }
    }

    #[tokio::test]
    async fn test_analysis_for_deleted_student_is_dropped() {
        let store = MemoryApplicantStore::new();
        let kept = store.insert_student(new_student("a@x.com")).await.unwrap();
        let gone = store.insert_student(new_student("b@x.com")).await.unwrap();
        store.delete_student(gone.id).await.unwrap();

        let recorded = store
            .record_analyses(vec![analysis_for(gone.id), analysis_for(kept.id)])
            .await
            .unwrap();

        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].student_id, kept.id);
        assert_eq!(store.analysis_count(), 1);
        let analyzed = store
            .list_students_by_status(StudentStatus::Analyzed)
            .await
            .unwrap();
        assert_eq!(analyzed.len(), 1);
    }
}
