use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::applicants::criteria::AcademicCriteria;
use crate::applicants::intake::{submit_application, ApplicationForm};
use crate::errors::AppError;
use crate::forms::MultipartForm;
use crate::models::student::StudentRow;
use crate::routes::StatusMessage;
use crate::state::AppState;
use crate::storage::FileStore;

#[derive(Serialize)]
pub struct ApplicationsResponse {
    pub status: &'static str,
    pub applications: Vec<StudentRow>,
}

#[derive(Serialize)]
pub struct ShortlistResponse {
    pub status: &'static str,
    pub criteria: AcademicCriteria,
    pub jd_file: String,
    pub shortlisted: Vec<StudentRow>,
}

/// POST /save
pub async fn handle_save(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<StatusMessage>, AppError> {
    let form = MultipartForm::read(multipart).await?;
    let application = ApplicationForm::from_multipart(form)?;
    let student = submit_application(state.store.as_ref(), &state.files, application).await?;

    Ok(Json(StatusMessage::success(format!(
        "Application for {} submitted successfully",
        student.name
    ))))
}

/// GET /applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
) -> Result<Json<ApplicationsResponse>, AppError> {
    let applications = state.store.list_students().await?;
    Ok(Json(ApplicationsResponse {
        status: "success",
        applications,
    }))
}

/// GET /resume/:filename
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let stored = state.files.read_resume(&filename).await?;
    Ok(([(header::CONTENT_TYPE, stored.content_type)], stored.bytes).into_response())
}

/// GET /shortlist
pub async fn handle_shortlist(
    State(state): State<AppState>,
) -> Result<Json<ShortlistResponse>, AppError> {
    let jd = state
        .store
        .active_job_description()
        .await?
        .ok_or_else(|| AppError::NotFound("No job description has been uploaded".to_string()))?;
    let criteria = jd.criteria();

    let shortlisted: Vec<StudentRow> = state
        .store
        .list_students()
        .await?
        .into_iter()
        .filter(|s| criteria.admits(s))
        .collect();

    Ok(Json(ShortlistResponse {
        status: "success",
        criteria,
        jd_file: jd.file_name,
        shortlisted,
    }))
}

/// DELETE /student/delete/:id
pub async fn handle_delete_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusMessage>, AppError> {
    let student = state
        .store
        .delete_student(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {id} not found")))?;

    remove_resume(&student).await;
    info!("Deleted student {id}");

    Ok(Json(StatusMessage::success(format!(
        "Student {} and their analyses deleted",
        student.name
    ))))
}

/// DELETE /student/delete_all
pub async fn handle_delete_all_students(
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, AppError> {
    let students = state.store.delete_all_students().await?;
    for student in &students {
        remove_resume(student).await;
    }
    info!("Deleted {} students", students.len());

    Ok(Json(StatusMessage::success(format!(
        "Deleted {} students and their analyses",
        students.len()
    ))))
}

/// The record is already gone, so a failed file removal is only logged.
async fn remove_resume(student: &StudentRow) {
    let path = std::path::Path::new(&student.resume_path);
    if let Err(e) = FileStore::remove_file(path).await {
        warn!("Could not remove resume {}: {e}", path.display());
    }
}
