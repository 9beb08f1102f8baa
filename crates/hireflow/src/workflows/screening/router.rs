use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinError;
use tracing::error;

use super::catalog::{CatalogError, CatalogRepository};
use super::domain::SessionId;
use super::service::{CandidateUpdate, ScreeningError, ScreeningService};
use super::session::{ResetScope, SessionRepository, SessionStoreError};
use super::settings::SettingsPatch;

/// Multipart field carrying the resume.
pub const RESUME_FIELD: &str = "resume";

type SharedService<C, S> = Arc<ScreeningService<C, S>>;

#[derive(Debug, Deserialize)]
pub struct NewJobRequest {
    pub role: String,
    pub description: String,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub scope: ResetScope,
}

/// Router exposing the catalog and the per-session screening flow.
pub fn screening_router<C, S>(service: SharedService<C, S>) -> Router
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/roles",
            get(list_roles_handler::<C, S>).post(add_role_handler::<C, S>),
        )
        .route("/api/v1/roles/:role", get(role_handler::<C, S>))
        .route("/api/v1/sessions", post(create_session_handler::<C, S>))
        .route(
            "/api/v1/sessions/:session_id",
            get(session_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/settings",
            put(settings_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/candidate",
            put(candidate_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/resume",
            post(upload_handler::<C, S>).get(download_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/resume/preview",
            get(preview_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/analysis",
            post(analysis_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/interview",
            post(interview_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/rejection",
            post(rejection_handler::<C, S>),
        )
        .route(
            "/api/v1/sessions/:session_id/reset",
            post(reset_handler::<C, S>),
        )
        .with_state(service)
}

pub(crate) async fn list_roles_handler<C, S>(
    State(service): State<SharedService<C, S>>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.catalog().list_roles() {
        Ok(roles) => (StatusCode::OK, Json(json!({ "roles": roles }))).into_response(),
        Err(err) => error_response(err.into()),
    }
}

pub(crate) async fn add_role_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Json(request): Json<NewJobRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.catalog().add_job_details(
        &request.role,
        &request.description,
        request.instructions.as_deref(),
    ) {
        Ok(requirement) => (StatusCode::CREATED, Json(requirement)).into_response(),
        Err(err) => error_response(err.into()),
    }
}

pub(crate) async fn role_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(role): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.catalog().get_requirement(&role) {
        Ok(requirement) => (StatusCode::OK, Json(requirement)).into_response(),
        Err(err) => error_response(err.into()),
    }
}

pub(crate) async fn create_session_handler<C, S>(
    State(service): State<SharedService<C, S>>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.create_session() {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.view(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn settings_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
    Json(patch): Json<SettingsPatch>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.update_settings(&SessionId(session_id), patch) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn candidate_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
    Json(update): Json<CandidateUpdate>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.set_candidate(&SessionId(session_id), update) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn upload_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    let mut upload = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(RESUME_FIELD) {
                    continue;
                }
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((file_name, bytes.to_vec())),
                    Err(err) => return bad_request(err.body_text()),
                }
            }
            Ok(None) => break,
            Err(err) => return bad_request(err.body_text()),
        }
    }

    let Some((file_name, bytes)) = upload else {
        return bad_request(format!("multipart field '{RESUME_FIELD}' is required"));
    };

    let upload = tokio::task::spawn_blocking(move || {
        service.upload_resume(&SessionId(session_id), &file_name, bytes)
    })
    .await;
    match upload {
        Ok(Ok(view)) => (StatusCode::OK, Json(view)).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => worker_failed(err),
    }
}

pub(crate) async fn download_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.resume_document(&SessionId(session_id)) {
        Ok(resume) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                resume.file_name.replace('"', "")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime::APPLICATION_PDF.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                resume.raw_bytes,
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    let preview =
        tokio::task::spawn_blocking(move || service.preview_resume(&SessionId(session_id))).await;
    match preview {
        Ok(Ok(preview)) => (StatusCode::OK, Json(preview)).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => worker_failed(err),
    }
}

pub(crate) async fn analysis_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.analyze(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn interview_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.proceed_to_interview(&SessionId(session_id)).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn rejection_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    match service.send_rejection_notice(&SessionId(session_id)).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reset_handler<C, S>(
    State(service): State<SharedService<C, S>>,
    Path(session_id): Path<String>,
    request: Option<Json<ResetRequest>>,
) -> Response
where
    C: CatalogRepository + 'static,
    S: SessionRepository + 'static,
{
    let scope = request.map(|Json(request)| request.scope).unwrap_or_default();
    match service.reset(&SessionId(session_id), scope) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn worker_failed(err: JoinError) -> Response {
    error!(error = %err, "document worker did not complete");
    let payload = json!({ "error": "the document could not be processed" });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

pub(crate) fn error_response(err: ScreeningError) -> Response {
    let status = match &err {
        ScreeningError::ConfigurationIncomplete { missing } => {
            let payload = json!({
                "error": err.to_string(),
                "missing": missing,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        ScreeningError::Extraction(_)
        | ScreeningError::Validation(_)
        | ScreeningError::Catalog(CatalogError::Validation { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ScreeningError::InvalidTransition { .. }
        | ScreeningError::Sessions(SessionStoreError::Conflict) => StatusCode::CONFLICT,
        ScreeningError::SessionNotFound(_)
        | ScreeningError::Sessions(SessionStoreError::NotFound)
        | ScreeningError::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
        ScreeningError::Catalog(_) | ScreeningError::Sessions(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
