use tracing::{info, warn};

use crate::analysis::extractor::DocumentKind;
use crate::applicants::criteria::AcademicCriteria;
use crate::errors::AppError;
use crate::forms::MultipartForm;
use crate::models::job_description::{JobDescriptionRow, NewJobDescription};
use crate::storage::FileStore;
use crate::store::ApplicantStore;

/// File field names accepted for the job description upload.
const JD_FIELDS: &[&str] = &["jd", "jd_file"];

/// Stores an uploaded job description with its academic criteria and makes it
/// the active one.
pub async fn set_criteria(
    store: &dyn ApplicantStore,
    files: &FileStore,
    mut form: MultipartForm,
) -> Result<JobDescriptionRow, AppError> {
    let upload = form
        .take_file(JD_FIELDS)
        .ok_or_else(|| AppError::Validation("A job description PDF is required".to_string()))?;
    if DocumentKind::from_path(upload.file_name.as_ref()) != Some(DocumentKind::Pdf) {
        return Err(AppError::Validation(
            "Invalid file type. Please upload a PDF file.".to_string(),
        ));
    }

    let criteria = AcademicCriteria::from_form(
        form.text("passingYear"),
        form.text("tenthMarks"),
        form.text("twelfthMarks"),
        form.text("degreeMarks"),
    )?;
    if criteria.is_empty() {
        info!("Job description {} uploaded without academic criteria", upload.file_name);
    }

    let file_name = files.save_jd(&upload.file_name, &upload.bytes).await?;
    let new_jd = NewJobDescription {
        file_name: file_name.clone(),
        original_name: upload.file_name,
        criteria,
    };

    match store.activate_job_description(new_jd).await {
        Ok(jd) => {
            info!("Activated job description {} ({})", jd.id, jd.file_name);
            Ok(jd)
        }
        Err(e) => {
            let path = files.jd_path(&file_name);
            if let Err(cleanup) = FileStore::remove_file(&path).await {
                warn!("Could not remove orphaned JD {}: {cleanup}", path.display());
            }
            Err(e)
        }
    }
}
