//! Inbound render request.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::SessionId;

/// Sample rate applied when the request does not carry one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

fn default_video_folder() -> String {
    "frames".to_string()
}
fn default_audio_folder() -> String {
    "audio".to_string()
}
fn default_output_folder() -> String {
    "videos".to_string()
}
fn default_true() -> bool {
    true
}

/// A request to compose one recording session into a video artifact.
///
/// Accepted by the front door and handed to the pipeline unchanged. The
/// folder names locate the session's assets inside `container`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Recording session identifier.
    pub session_id: SessionId,

    /// Blob container holding the session's assets.
    pub container: String,

    /// Advisory frame rate from the capturing device. Only consulted when
    /// the recording stats cannot produce one themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,

    /// Requested output sample rate in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Folder holding the frame images.
    #[serde(default = "default_video_folder")]
    pub video_folder: String,

    /// Folder holding the audio chunks.
    #[serde(default = "default_audio_folder")]
    pub audio_folder: String,

    /// Folder receiving the final artifact.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Center-crop to a portrait frame instead of the landscape fit.
    #[serde(default)]
    pub vertical_crop: bool,

    /// Whether the session recorded audio.
    #[serde(default = "default_true")]
    pub has_audio: bool,
}

impl RenderRequest {
    /// Create a request with default folders and flags.
    pub fn new(session_id: impl Into<SessionId>, container: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            container: container.into(),
            frame_rate: None,
            sample_rate: None,
            video_folder: default_video_folder(),
            audio_folder: default_audio_folder(),
            output_folder: default_output_folder(),
            vertical_crop: false,
            has_audio: true,
        }
    }

    /// Effective output sample rate.
    pub fn sample_rate_or_default(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }
}
