//! Artifact publication and terminal reporting.

use std::path::Path;

use tracing::{info, warn};

use stitch_models::{JobResult, RenderRequest, VideoShape};

use crate::error::{JobError, PipelineResult};
use crate::pipeline::JobContext;

/// Where the published artifact ended up.
#[derive(Debug, Clone)]
pub struct PublishedArtifact {
    /// Blob key of the uploaded video
    pub output_key: String,
    /// Public reference handed to callers through the terminal document
    pub url: String,
}

/// Upload the final artifact and persist the success document.
///
/// Any failure here is `PublishFailed`: the artifact exists locally but was
/// never delivered, so the job must report failure.
pub async fn publish_success(
    ctx: &JobContext,
    request: &RenderRequest,
    artifact: &Path,
    shape: VideoShape,
) -> PipelineResult<PublishedArtifact> {
    let output_key = ctx
        .storage
        .upload_artifact(
            &request.container,
            &request.output_folder,
            &request.session_id,
            artifact,
        )
        .await
        .map_err(JobError::PublishFailed)?;

    let url = ctx
        .storage
        .artifact_url(&request.container, &output_key, ctx.config.url_expiry)
        .await
        .map_err(JobError::PublishFailed)?;

    let result = JobResult::completed(&output_key, &url, shape);
    ctx.storage
        .write_job_result(&request.container, &request.session_id, &result)
        .await
        .map_err(JobError::PublishFailed)?;

    info!(output_key = %output_key, "Published artifact");

    Ok(PublishedArtifact { output_key, url })
}

/// Persist the failure document, best-effort.
///
/// A failure while writing the failure document is logged and swallowed;
/// it must not mask the original error.
pub async fn publish_failure(ctx: &JobContext, request: &RenderRequest, error: &JobError) {
    let result = JobResult::failed(error.to_string());

    if let Err(e) = ctx
        .storage
        .write_job_result(&request.container, &request.session_id, &result)
        .await
    {
        warn!("Failed to write failure document: {}", e);
    }
}
