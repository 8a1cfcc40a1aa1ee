//! Frame download and gap repair.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use stitch_media::sequence_file_name;
use stitch_models::{RenderRequest, SessionId};
use stitch_storage::keys;

use crate::error::{JobError, PipelineResult};
use crate::fetch::AssetFetcher;

/// The gapless frame sequence produced for the encode stage.
#[derive(Debug)]
pub struct FrameSet {
    /// Directory holding `000001.jpg..0000NN.jpg` with no skipped integers
    pub sequence_dir: PathBuf,
    /// Frames actually recovered (N)
    pub recovered: u32,
    /// Frames the device declared
    pub declared: u32,
}

/// Download every declared frame and rewrite the recovered set into a
/// gapless, zero-padded sequence.
///
/// Missing or empty frames are skipped, not fatal; recovering zero frames
/// is.
pub async fn collect_frames(
    fetcher: &AssetFetcher<'_>,
    request: &RenderRequest,
    declared: u32,
    work_dir: &Path,
) -> PipelineResult<FrameSet> {
    let session = &request.session_id;
    let folder = &request.video_folder;

    collect_frames_with(
        |index| {
            let key = keys::frame(folder, session, index);
            async move { fetcher.fetch(&key).await }
        },
        session,
        declared,
        work_dir,
    )
    .await
}

async fn collect_frames_with<F, Fut>(
    fetch: F,
    session: &SessionId,
    declared: u32,
    work_dir: &Path,
) -> PipelineResult<FrameSet>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<Vec<u8>, JobError>>,
{
    let raw_dir = work_dir.join("frames");
    let sequence_dir = work_dir.join("sequence");
    fs::create_dir_all(&raw_dir).await?;

    let mut persisted = 0u32;
    for index in 1..=declared {
        match fetch(index).await {
            Ok(bytes) if bytes.is_empty() => {
                warn!(index, "Skipping empty frame payload");
            }
            Ok(bytes) => {
                fs::write(raw_dir.join(format!("frame_{}.jpg", index)), &bytes).await?;
                persisted += 1;
            }
            Err(e) => {
                warn!(index, "Frame skipped: {}", e);
            }
        }
    }

    if persisted == 0 {
        return Err(JobError::NoFramesRecovered(session.to_string()));
    }

    let recovered = renumber_frames(&raw_dir, &sequence_dir).await?;
    info!(declared, recovered, "Sequenced frames");

    Ok(FrameSet {
        sequence_dir,
        recovered,
        declared,
    })
}

/// Rewrite persisted frames into a strictly gapless sequence `1..=N`.
///
/// The encode stage treats the first gap in a numbered sequence as
/// end-of-input, so any skipped original index would silently truncate the
/// video unless eliminated here first.
pub async fn renumber_frames(raw_dir: &Path, sequence_dir: &Path) -> io::Result<u32> {
    let mut indexed: Vec<(u32, PathBuf)> = Vec::new();

    let mut entries = fs::read_dir(raw_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(index) = parse_frame_index(&path) {
            indexed.push((index, path));
        }
    }
    indexed.sort_by_key(|(index, _)| *index);

    fs::create_dir_all(sequence_dir).await?;

    let mut next = 0u32;
    for (_, path) in &indexed {
        next += 1;
        fs::rename(path, sequence_dir.join(sequence_file_name(next))).await?;
    }

    Ok(next)
}

fn parse_frame_index(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("frame_")?
        .strip_suffix(".jpg")?
        .parse()
        .ok()
}
