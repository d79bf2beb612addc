pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;

use crate::applicants::handlers as applicants;
use crate::screening::handlers as screening;
use crate::state::AppState;

/// `{status: "success", message}` body shared by the write endpoints.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: String,
}

impl StatusMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Student intake
        .route("/save", post(applicants::handle_save))
        .route("/applications", get(applicants::handle_list_applications))
        .route("/resume/:filename", get(applicants::handle_get_resume))
        .route("/shortlist", get(applicants::handle_shortlist))
        .route("/student/delete/:id", delete(applicants::handle_delete_student))
        .route(
            "/student/delete_all",
            delete(applicants::handle_delete_all_students),
        )
        // Recruiter screening
        .route("/setcriteria", post(screening::handle_set_criteria))
        .route("/criteria", get(screening::handle_get_criteria))
        .route("/jd/:filename", get(screening::handle_get_jd))
        .route("/parse_all", post(screening::handle_parse_all))
        .route("/analyze", post(screening::handle_analyze))
        .route("/analyzed", get(screening::handle_analyzed))
        .route(
            "/analysis/delete/:id",
            delete(screening::handle_delete_analysis),
        )
        .route(
            "/analysis/delete_all",
            delete(screening::handle_delete_all_analyses),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
