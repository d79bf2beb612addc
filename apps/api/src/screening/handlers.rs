use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::engine::RelevancePackage;
use crate::applicants::criteria::AcademicCriteria;
use crate::errors::AppError;
use crate::forms::MultipartForm;
use crate::models::analysis::AnalysisResultRow;
use crate::models::job_description::JobDescriptionRow;
use crate::models::student::{StudentRow, StudentStatus};
use crate::routes::StatusMessage;
use crate::screening::batch::{run_batch, BatchReport};
use crate::screening::job_descriptions::set_criteria;
use crate::screening::on_demand::analyze_upload;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CriteriaResponse {
    pub status: &'static str,
    pub criteria: AcademicCriteria,
    pub jd_file: String,
    pub job_description: JobDescriptionRow,
}

impl CriteriaResponse {
    fn from_row(jd: JobDescriptionRow) -> Self {
        Self {
            status: "success",
            criteria: jd.criteria(),
            jd_file: jd.file_name.clone(),
            job_description: jd,
        }
    }
}

#[derive(Serialize)]
pub struct AnalyzedStudent {
    #[serde(flatten)]
    pub student: StudentRow,
    pub analyses: Vec<AnalysisResultRow>,
}

#[derive(Serialize)]
pub struct AnalyzedResponse {
    pub status: &'static str,
    pub analyzed_students: Vec<AnalyzedStudent>,
}

/// POST /setcriteria
pub async fn handle_set_criteria(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CriteriaResponse>, AppError> {
    let form = MultipartForm::read(multipart).await?;
    let jd = set_criteria(state.store.as_ref(), &state.files, form).await?;
    Ok(Json(CriteriaResponse::from_row(jd)))
}

/// GET /criteria
pub async fn handle_get_criteria(
    State(state): State<AppState>,
) -> Result<Json<CriteriaResponse>, AppError> {
    let jd = state
        .store
        .active_job_description()
        .await?
        .ok_or_else(|| AppError::NotFound("No job description has been uploaded".to_string()))?;
    Ok(Json(CriteriaResponse::from_row(jd)))
}

/// GET /jd/:filename
pub async fn handle_get_jd(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let stored = state.files.read_jd(&filename).await?;
    Ok(([(header::CONTENT_TYPE, stored.content_type)], stored.bytes).into_response())
}

/// POST /parse_all
///
/// The run is detached from the request: a client that disconnects does not
/// cancel it, and its results are still recorded.
pub async fn handle_parse_all(
    State(state): State<AppState>,
) -> Result<Json<BatchReport>, AppError> {
    let running = state
        .batch_lock
        .clone()
        .try_lock_owned()
        .map_err(|_| AppError::Conflict("A batch analysis is already running".to_string()))?;

    let AppState {
        store,
        files,
        engine,
        ..
    } = state;
    let batch = tokio::spawn(async move {
        let _running = running;
        run_batch(store.as_ref(), &files, &engine).await
    });

    let report = batch
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("batch task failed: {e}")))??;
    Ok(Json(report))
}

/// POST /analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<RelevancePackage>, AppError> {
    let form = MultipartForm::read(multipart).await?;
    let package = analyze_upload(state.store.as_ref(), &state.files, &state.engine, form).await?;
    Ok(Json(package))
}

/// GET /analyzed
pub async fn handle_analyzed(
    State(state): State<AppState>,
) -> Result<Json<AnalyzedResponse>, AppError> {
    let students = state
        .store
        .list_students_by_status(StudentStatus::Analyzed)
        .await?;
    let ids: Vec<Uuid> = students.iter().map(|s| s.id).collect();

    let mut by_student: HashMap<Uuid, Vec<AnalysisResultRow>> = HashMap::new();
    for analysis in state.store.list_analyses_for(&ids).await? {
        by_student
            .entry(analysis.student_id)
            .or_default()
            .push(analysis);
    }

    let analyzed_students = students
        .into_iter()
        .map(|student| AnalyzedStudent {
            analyses: by_student.remove(&student.id).unwrap_or_default(),
            student,
        })
        .collect();

    Ok(Json(AnalyzedResponse {
        status: "success",
        analyzed_students,
    }))
}

/// DELETE /analysis/delete/:id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusMessage>, AppError> {
    let analysis = state
        .store
        .delete_analysis(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;

    info!("Deleted analysis {id}; student {} reset", analysis.student_id);
    Ok(Json(StatusMessage::success(format!(
        "Analysis {id} deleted and student reset to Pending"
    ))))
}

/// DELETE /analysis/delete_all
pub async fn handle_delete_all_analyses(
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, AppError> {
    let removed = state.store.delete_all_analyses().await?;
    info!("Deleted {removed} analyses");
    Ok(Json(StatusMessage::success(format!(
        "Deleted {removed} analyses and reset affected students to Pending"
    ))))
}
