//! Pipeline error taxonomy.

use std::fmt;

use thiserror::Error;

use stitch_media::MediaError;
use stitch_storage::StorageError;

pub type PipelineResult<T> = Result<T, JobError>;

/// Which external-tool stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeStage {
    /// Frames to silent video
    Frames,
    /// Audio chunk concatenation
    AudioConcat,
    /// Silent video plus audio merge
    Merge,
}

impl fmt::Display for TranscodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TranscodeStage::Frames => "frames",
            TranscodeStage::AudioConcat => "audio-concat",
            TranscodeStage::Merge => "merge",
        };
        write!(f, "{}", name)
    }
}

/// Job-fatal and per-item errors of the pipeline.
///
/// Everything except `AssetUnavailable` ends the job; a single unavailable
/// asset is the caller's decision, and both frames and audio chunks
/// tolerate it as an omission.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Recording metadata not found for session {0}")]
    MetadataNotFound(String),

    #[error("Asset {key} unavailable after {attempts} attempts: {source}")]
    AssetUnavailable {
        key: String,
        attempts: u32,
        #[source]
        source: StorageError,
    },

    #[error("No frames recovered for session {0}")]
    NoFramesRecovered(String),

    #[error("Transcode stage {stage} failed: {source}")]
    TranscodeFailed {
        stage: TranscodeStage,
        #[source]
        source: MediaError,
    },

    #[error("Publish failed: {0}")]
    PublishFailed(#[source] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JobError {
    /// Tag a media error with the stage it came from.
    pub fn transcode(stage: TranscodeStage, source: MediaError) -> Self {
        Self::TranscodeFailed { stage, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_error_names_the_stage() {
        let err = JobError::transcode(
            TranscodeStage::AudioConcat,
            MediaError::ffmpeg_failed("exit 1", None, Some(1)),
        );
        assert!(err.to_string().contains("audio-concat"));
    }
}
