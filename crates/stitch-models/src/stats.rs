//! Recording statistics document.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Statistics document written by the capture device at end of recording.
///
/// The single source of truth for declared asset counts. Loaded once per
/// job and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStats {
    /// Declared number of captured frames.
    #[serde(default)]
    pub total_frames: u32,

    /// Declared number of captured audio chunks.
    #[serde(default)]
    pub total_audio_chunks: u32,

    /// Recording duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Recording duration in seconds, when the device wrote one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    /// Frame rate the device measured while recording.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_frame_rate: Option<f64>,
}

impl RecordingStats {
    /// Recording duration in seconds, falling back to the millisecond field.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_seconds
            .or_else(|| self.duration_ms.map(|ms| ms as f64 / 1000.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_prefers_seconds_field() {
        let stats: RecordingStats =
            serde_json::from_str(r#"{"durationSeconds": 12.5, "durationMs": 99000}"#).unwrap();
        assert_eq!(stats.duration_secs(), Some(12.5));
    }

    #[test]
    fn test_duration_falls_back_to_millis() {
        let stats: RecordingStats = serde_json::from_str(r#"{"durationMs": 20000}"#).unwrap();
        assert_eq!(stats.duration_secs(), Some(20.0));
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let stats: RecordingStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.total_frames, 0);
        assert_eq!(stats.total_audio_chunks, 0);
        assert_eq!(stats.duration_secs(), None);
    }
}
