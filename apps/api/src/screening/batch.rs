//! Recruiter-triggered scoring pass over every pending application.
//!
//! Students are analyzed one at a time against the active job description.
//! A student whose analysis fails is skipped and logged; the rest are
//! persisted together at the end.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::engine::AnalysisEngine;
use crate::errors::AppError;
use crate::models::analysis::NewAnalysis;
use crate::models::student::StudentStatus;
use crate::storage::FileStore;
use crate::store::ApplicantStore;

#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub student_id: Uuid,
    pub name: String,
    pub email: String,
    pub final_weighted_score: f64,
    pub fit_verdict: String,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub message: String,
    pub results: Vec<BatchOutcome>,
    pub skipped: usize,
}

pub async fn run_batch(
    store: &dyn ApplicantStore,
    files: &FileStore,
    engine: &AnalysisEngine,
) -> Result<BatchReport, AppError> {
    let pending = store.list_students_by_status(StudentStatus::Pending).await?;
    if pending.is_empty() {
        return Ok(BatchReport {
            message: "No pending applications to analyze".to_string(),
            results: Vec::new(),
            skipped: 0,
        });
    }

    let jd = store.active_job_description().await?.ok_or_else(|| {
        AppError::Validation("No job description uploaded. Set criteria first.".to_string())
    })?;
    let jd_path = files.jd_path(&jd.file_name);

    info!(
        "Batch analysis of {} pending applications against {}",
        pending.len(),
        jd.file_name
    );

    let mut analyses = Vec::with_capacity(pending.len());
    let mut results = Vec::with_capacity(pending.len());
    let mut skipped = 0;

    for student in &pending {
        let package = match engine
            .analyze(std::path::Path::new(&student.resume_path), &jd_path)
            .await
        {
            Ok(package) => package,
            Err(e) => {
                warn!("Skipping student {} ({}): {e}", student.id, student.email);
                skipped += 1;
                continue;
            }
        };

        let analysis = NewAnalysis::from_package(student.id, Some(jd.id), package);
        results.push(BatchOutcome {
            student_id: student.id,
            name: student.name.clone(),
            email: student.email.clone(),
            final_weighted_score: analysis.final_weighted_score,
            fit_verdict: analysis.fit_verdict.clone(),
        });
        analyses.push(analysis);
    }

    if !analyses.is_empty() {
        store.record_analyses(analyses).await?;
    }

    info!("Batch finished: {} analyzed, {skipped} skipped", results.len());

    Ok(BatchReport {
        message: format!(
            "Analyzed {} of {} pending applications",
            results.len(),
            pending.len()
        ),
        results,
        skipped,
    })
}
