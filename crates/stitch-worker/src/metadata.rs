//! Recording metadata resolution.

use tracing::{info, warn};

use stitch_models::{RecordingStats, RenderRequest, ResolvedTiming};
use stitch_storage::keys;

use crate::error::{JobError, PipelineResult};
use crate::fetch::AssetFetcher;

/// Load the session's recording statistics and derive the authoritative
/// timing.
///
/// An absent or unparsable document is fatal: without declared counts the
/// pipeline has nothing to fetch.
pub async fn resolve(
    fetcher: &AssetFetcher<'_>,
    request: &RenderRequest,
) -> PipelineResult<(RecordingStats, ResolvedTiming)> {
    let key = keys::recording_stats(&request.session_id);

    let bytes = fetcher.fetch(&key).await.map_err(|e| {
        warn!("Recording stats unavailable: {}", e);
        JobError::MetadataNotFound(request.session_id.to_string())
    })?;

    let stats: RecordingStats = serde_json::from_slice(&bytes).map_err(|e| {
        warn!("Recording stats unparsable: {}", e);
        JobError::MetadataNotFound(request.session_id.to_string())
    })?;

    let timing = ResolvedTiming::resolve(&stats, request.frame_rate);
    info!(
        fps = timing.fps,
        declared_frames = stats.total_frames,
        declared_chunks = stats.total_audio_chunks,
        "Resolved recording timing"
    );

    Ok((stats, timing))
}
