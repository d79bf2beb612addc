//! Application intake — validates a submission, stores the resume, records the student.

use tracing::{info, warn};

use crate::analysis::extractor::DocumentKind;
use crate::errors::AppError;
use crate::forms::{MultipartForm, UploadedFile};
use crate::models::student::{NewStudent, StudentRow};
use crate::storage::FileStore;
use crate::store::{ApplicantStore, DUPLICATE_EMAIL};

// Column widths of the students table.
const MAX_TEXT: usize = 100;
const MAX_EMAIL: usize = 120;
const MAX_PHONE: usize = 20;
const MAX_MARKS: usize = 10;

/// A fully validated `/save` submission.
#[derive(Debug)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub degree: String,
    pub specialization: String,
    pub passing_year: String,
    pub tenth_marks: String,
    pub twelfth_marks: String,
    pub degree_marks: String,
    pub resume: UploadedFile,
    pub resume_kind: DocumentKind,
}

impl ApplicationForm {
    pub fn from_multipart(mut form: MultipartForm) -> Result<Self, AppError> {
        let resume = form
            .take_file(&["resume"])
            .ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;
        let resume_kind = DocumentKind::from_path(resume.file_name.as_ref()).ok_or_else(|| {
            AppError::Validation("Resume must be a PDF or DOCX file".to_string())
        })?;

        let email = bounded("email", form.require_text("email")?, MAX_EMAIL)?.to_lowercase();
        if !is_plausible_email(&email) {
            return Err(AppError::Validation(format!("'{email}' is not a valid email")));
        }

        // The student form sends degree marks as marksValue.
        let degree_marks = form
            .text("degreeMarks")
            .or_else(|| form.text("marksValue"))
            .ok_or_else(|| AppError::Validation("Field 'degreeMarks' is required".to_string()))?;
        let degree_marks = bounded("degreeMarks", degree_marks, MAX_MARKS)?;

        let required = |name: &str, max: usize| bounded(name, form.require_text(name)?, max);

        Ok(Self {
            name: required("name", MAX_TEXT)?,
            email,
            phone: required("phone", MAX_PHONE)?,
            degree: required("degree", MAX_TEXT)?,
            specialization: required("specialization", MAX_TEXT)?,
            passing_year: required("passingYear", MAX_MARKS)?,
            tenth_marks: required("tenthMarks", MAX_MARKS)?,
            twelfth_marks: required("twelfthMarks", MAX_MARKS)?,
            degree_marks,
            resume,
            resume_kind,
        })
    }
}

fn bounded(field: &str, value: &str, max: usize) -> Result<String, AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "Field '{field}' must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Stores the resume and the student record.
///
/// A duplicate email is rejected before anything is written. If the insert
/// fails after the resume was saved, the file is removed again.
pub async fn submit_application(
    store: &dyn ApplicantStore,
    files: &FileStore,
    application: ApplicationForm,
) -> Result<StudentRow, AppError> {
    if store.email_exists(&application.email).await? {
        return Err(AppError::Validation(DUPLICATE_EMAIL.to_string()));
    }

    let file_name = FileStore::resume_file_name(&application.email, application.resume_kind);
    let resume_path = files
        .save_resume(&file_name, &application.resume.bytes)
        .await?;

    let new_student = NewStudent {
        name: application.name,
        email: application.email,
        phone: application.phone,
        degree: application.degree,
        specialization: application.specialization,
        passing_year: application.passing_year,
        tenth_marks: application.tenth_marks,
        twelfth_marks: application.twelfth_marks,
        degree_marks: application.degree_marks,
        resume_path: resume_path.to_string_lossy().into_owned(),
    };

    match store.insert_student(new_student).await {
        Ok(student) => {
            info!("New application {} from {}", student.id, student.email);
            Ok(student)
        }
        Err(e) => {
            if let Err(cleanup) = FileStore::remove_file(&resume_path).await {
                warn!(
                    "Could not remove orphaned resume {}: {cleanup}",
                    resume_path.display()
                );
            }
            Err(e)
        }
    }
}
