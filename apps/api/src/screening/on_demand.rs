//! One-off scoring of an uploaded resume against the active job description.
//! Nothing is persisted; the upload is discarded after scoring.

use tracing::{info, warn};

use crate::analysis::engine::{AnalysisEngine, RelevancePackage};
use crate::analysis::extractor::DocumentKind;
use crate::errors::AppError;
use crate::forms::MultipartForm;
use crate::storage::FileStore;
use crate::store::ApplicantStore;

pub async fn analyze_upload(
    store: &dyn ApplicantStore,
    files: &FileStore,
    engine: &AnalysisEngine,
    mut form: MultipartForm,
) -> Result<RelevancePackage, AppError> {
    let resume = form
        .take_file(&["resume"])
        .ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;
    let kind = DocumentKind::from_path(resume.file_name.as_ref()).ok_or_else(|| {
        AppError::Validation("Resume must be a PDF or DOCX file".to_string())
    })?;

    let jd = store.active_job_description().await?.ok_or_else(|| {
        AppError::Validation("No job description uploaded. Set criteria first.".to_string())
    })?;

    let scratch = files.save_scratch(kind, &resume.bytes).await?;
    let outcome = engine.analyze(&scratch, &files.jd_path(&jd.file_name)).await;
    if let Err(e) = FileStore::remove_file(&scratch).await {
        warn!("Could not remove scratch upload {}: {e}", scratch.display());
    }

    let package = outcome?;
    info!(
        "On-demand analysis of {} against {}: {:.2}",
        resume.file_name, jd.file_name, package.final_weighted_score
    );
    Ok(package)
}
