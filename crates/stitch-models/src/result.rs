//! Terminal job-result document.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::VideoShape;

/// Durable outcome record for one session.
///
/// Exactly one of these is persisted per session id, and it is the only
/// signal of job outcome a caller can observe: the original request was
/// acknowledged long before the pipeline finished.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum JobResult {
    /// The artifact was produced and uploaded.
    #[serde(rename_all = "camelCase")]
    Completed {
        /// Blob key of the uploaded artifact.
        output_key: String,
        /// Public reference to the artifact.
        url: String,
        /// Geometry applied by the encode stage.
        #[serde(flatten)]
        shape: VideoShape,
        /// When the job finished.
        completed_at: DateTime<Utc>,
    },
    /// The job failed; no artifact was delivered.
    #[serde(rename_all = "camelCase")]
    Failed {
        /// Description of the fatal error.
        error: String,
        /// When the job failed.
        failed_at: DateTime<Utc>,
    },
}

impl JobResult {
    /// Build a success record stamped now.
    pub fn completed(
        output_key: impl Into<String>,
        url: impl Into<String>,
        shape: VideoShape,
    ) -> Self {
        Self::Completed {
            output_key: output_key.into(),
            url: url.into(),
            shape,
            completed_at: Utc::now(),
        }
    }

    /// Build a failure record stamped now.
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
            failed_at: Utc::now(),
        }
    }

    /// True for the success variant.
    pub fn is_completed(&self) -> bool {
        matches!(self, JobResult::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_document_shape() {
        let result = JobResult::completed("videos/abc.mp4", "https://example/abc", VideoShape::for_crop(true));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "completed");
        assert_eq!(json["outputKey"], "videos/abc.mp4");
        assert_eq!(json["width"], 720);
        assert_eq!(json["height"], 1280);
        assert_eq!(json["verticalCrop"], true);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failed_document_shape() {
        let result = JobResult::failed("no frames recovered");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "no frames recovered");
        assert!(json.get("outputKey").is_none());
        assert!(!result.is_completed());
    }
}
