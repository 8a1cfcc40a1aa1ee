//! Job orchestration.
//!
//! The orchestrator owns the per-job working directory and sequences the
//! pipeline: resolve metadata, sequence frames, collect audio, run the
//! transcode stages, publish. Whatever happens, exactly one terminal
//! document is written and the working directory is reclaimed.

use std::io::ErrorKind;
use std::sync::Arc;

use tokio::fs;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use stitch_media as compose;
use stitch_models::{RenderRequest, VideoShape};
use stitch_storage::{BlobClient, StorageResult};

use crate::audio::{self, AudioSet};
use crate::config::WorkerConfig;
use crate::error::{JobError, PipelineResult, TranscodeStage};
use crate::fetch::AssetFetcher;
use crate::frames;
use crate::metadata;
use crate::publish::{self, PublishedArtifact};

/// Shared dependencies for job processing.
pub struct JobContext {
    pub config: WorkerConfig,
    pub storage: BlobClient,
}

impl JobContext {
    pub fn new(config: WorkerConfig, storage: BlobClient) -> Self {
        Self { config, storage }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            config: WorkerConfig::from_env(),
            storage: BlobClient::from_env()?,
        })
    }
}

/// Hand a job to background execution.
///
/// The caller gets control back immediately; the detached task owns its
/// error boundary and reports only through the terminal document.
pub fn spawn(ctx: Arc<JobContext>, request: RenderRequest) -> JoinHandle<()> {
    let span = info_span!("job", session_id = %request.session_id);
    tokio::spawn(run(ctx, request).instrument(span))
}

/// Run one job to its terminal state.
pub async fn run(ctx: Arc<JobContext>, request: RenderRequest) {
    // Fresh, uniquely named directory so concurrent jobs never contend.
    let work_dir = ctx
        .config
        .work_dir
        .join(format!("{}-{}", request.session_id, Uuid::new_v4()));

    match process(&ctx, &request, &work_dir).await {
        Ok(published) => {
            info!(output_key = %published.output_key, "Job completed");
        }
        Err(err) => {
            error!("Job failed: {}", err);
            publish::publish_failure(&ctx, &request, &err).await;
        }
    }

    // Reclamation failures never outlive the job.
    if let Err(e) = fs::remove_dir_all(&work_dir).await {
        if e.kind() != ErrorKind::NotFound {
            warn!("Failed to reclaim {}: {}", work_dir.display(), e);
        }
    }
}

async fn process(
    ctx: &JobContext,
    request: &RenderRequest,
    work_dir: &std::path::Path,
) -> PipelineResult<PublishedArtifact> {
    fs::create_dir_all(work_dir).await?;

    let fetcher = AssetFetcher::new(&ctx.storage, &request.container, ctx.config.retry.clone());

    let (stats, timing) = metadata::resolve(&fetcher, request).await?;

    let frame_set = frames::collect_frames(&fetcher, request, stats.total_frames, work_dir).await?;

    let audio_set = if request.has_audio && stats.total_audio_chunks > 0 {
        audio::collect_audio(&fetcher, request, stats.total_audio_chunks, work_dir).await?
    } else {
        AudioSet::absent()
    };

    let sample_rate = request.sample_rate_or_default();
    let shape = VideoShape::for_crop(request.vertical_crop);

    let silent = work_dir.join("silent.mp4");
    compose::encode_frame_sequence(
        &frame_set.sequence_dir,
        timing.fps,
        request.vertical_crop,
        &silent,
    )
    .await
    .map_err(|e| JobError::transcode(TranscodeStage::Frames, e))?;

    let final_artifact = match audio_set.manifest {
        Some(ref manifest) => {
            let track = work_dir.join("audio.wav");
            compose::concat_audio_chunks(manifest, sample_rate, &track)
                .await
                .map_err(|e| JobError::transcode(TranscodeStage::AudioConcat, e))?;

            let merged = work_dir.join("final.mp4");
            compose::merge_video_audio(&silent, &track, sample_rate, &merged)
                .await
                .map_err(|e| JobError::transcode(TranscodeStage::Merge, e))?;
            merged
        }
        // No audio recovered or none declared: the silent video is the
        // deliverable.
        None => silent,
    };

    publish::publish_success(ctx, request, &final_artifact, shape).await
}
