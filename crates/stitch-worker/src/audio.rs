//! Audio chunk collection.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use stitch_media::write_concat_manifest;
use stitch_models::RenderRequest;
use stitch_storage::keys;

use crate::error::{JobError, PipelineResult};
use crate::fetch::AssetFetcher;

/// The recovered audio chunks and their concatenation manifest.
///
/// Missing chunks are tracked, never replaced by silence: the manifest
/// lists persisted chunks in ascending original order, contiguous or not.
#[derive(Debug)]
pub struct AudioSet {
    /// Chunks actually persisted
    pub downloaded: u32,
    /// 1-based original indices that could not be recovered
    pub missing: Vec<u32>,
    /// Concat manifest, present only when at least one chunk was persisted
    pub manifest: Option<PathBuf>,
}

impl AudioSet {
    /// The no-audio outcome: nothing downloaded, nothing to concatenate.
    pub fn absent() -> Self {
        Self {
            downloaded: 0,
            missing: Vec::new(),
            manifest: None,
        }
    }
}

/// Download every declared audio chunk and build the concatenation
/// manifest.
///
/// Only invoked when the job declares audio and a positive chunk count;
/// recovering zero chunks downgrades the job to silent rather than failing
/// it.
pub async fn collect_audio(
    fetcher: &AssetFetcher<'_>,
    request: &RenderRequest,
    declared: u32,
    work_dir: &Path,
) -> PipelineResult<AudioSet> {
    let session = &request.session_id;
    let folder = &request.audio_folder;

    collect_audio_with(
        |index| {
            let key = keys::audio_chunk(folder, session, index);
            async move { fetcher.fetch(&key).await }
        },
        declared,
        work_dir,
    )
    .await
}

async fn collect_audio_with<F, Fut>(
    fetch: F,
    declared: u32,
    work_dir: &Path,
) -> PipelineResult<AudioSet>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Vec<u8>, JobError>>,
{
    let chunk_dir = work_dir.join("audio");
    fs::create_dir_all(&chunk_dir).await?;

    let mut persisted: Vec<PathBuf> = Vec::new();
    let mut missing: Vec<u32> = Vec::new();

    for index in 1..=declared {
        match fetch(index).await {
            Ok(bytes) if bytes.is_empty() => {
                warn!(index, "Skipping empty audio chunk payload");
                missing.push(index);
            }
            Ok(bytes) => {
                let path = chunk_dir.join(format!("chunk_{}.wav", index));
                fs::write(&path, &bytes).await?;
                persisted.push(path);
            }
            Err(e) => {
                warn!(index, "Audio chunk skipped: {}", e);
                missing.push(index);
            }
        }
    }

    if persisted.is_empty() {
        info!(declared, "No audio chunks recovered; continuing without audio");
        return Ok(AudioSet::absent());
    }

    let manifest = work_dir.join("chunks.txt");
    write_concat_manifest(&persisted, &manifest).await?;

    if !missing.is_empty() {
        info!(
            declared,
            downloaded = persisted.len(),
            missing = ?missing,
            "Audio chunks missing; manifest lists recovered chunks only"
        );
    }

    Ok(AudioSet {
        downloaded: persisted.len() as u32,
        missing,
        manifest: Some(manifest),
    })
}
