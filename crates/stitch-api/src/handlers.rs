//! Request handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use stitch_models::{JobResult, RenderRequest, SessionId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Acknowledgment returned when a job is accepted.
#[derive(Serialize)]
pub struct AcceptedResponse {
    pub session_id: String,
    pub status: String,
}

/// Accept a render request and hand it to background execution.
///
/// The response only acknowledges acceptance; the outcome arrives through
/// the terminal document, which callers poll.
pub async fn submit_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> ApiResult<(StatusCode, Json<AcceptedResponse>)> {
    if request.session_id.is_empty() {
        return Err(ApiError::bad_request("sessionId must not be empty"));
    }
    if request.container.trim().is_empty() {
        return Err(ApiError::bad_request("container must not be empty"));
    }

    let session_id = request.session_id.to_string();
    // Fire and forget: the detached task owns its own error boundary and
    // reports only through the terminal document.
    let _ = stitch_worker::spawn(Arc::clone(&state.jobs), request);

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            session_id,
            status: "accepted".to_string(),
        }),
    ))
}

#[derive(Deserialize)]
pub struct ResultQuery {
    pub container: String,
}

/// Fetch the terminal document for a session, if the job has finished.
pub async fn get_render_result(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<ResultQuery>,
) -> ApiResult<Json<JobResult>> {
    let session = SessionId::from_string(session_id);

    match state
        .jobs
        .storage
        .load_job_result(&query.container, &session)
        .await?
    {
        Some(result) => Ok(Json(result)),
        None => Err(ApiError::not_found("No terminal document for session yet")),
    }
}

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check endpoint.
pub async fn ready() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ready" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_storage::{BlobClient, BlobConfig};
    use stitch_worker::{JobContext, WorkerConfig};

    fn test_state() -> AppState {
        let storage = BlobClient::new(BlobConfig {
            endpoint_url: "http://localhost:9000".to_string(),
            access_key_id: "test".to_string(),
            secret_access_key: "test".to_string(),
            region: "auto".to_string(),
        });

        AppState {
            config: crate::config::ApiConfig::default(),
            jobs: Arc::new(JobContext::new(WorkerConfig::default(), storage)),
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_session_id() {
        let request = RenderRequest::new("  ", "recordings");

        let result = submit_render(State(test_state()), Json(request)).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_container() {
        let request = RenderRequest::new("sess1", "");

        let result = submit_render(State(test_state()), Json(request)).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
