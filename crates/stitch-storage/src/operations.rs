//! Typed storage operations over the raw client.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use stitch_models::{JobResult, RecordingStats, SessionId};

use crate::client::BlobClient;
use crate::error::{StorageError, StorageResult};
use crate::keys;

impl BlobClient {
    /// Load the recording-statistics document for a session.
    pub async fn load_recording_stats(
        &self,
        container: &str,
        session: &SessionId,
    ) -> StorageResult<RecordingStats> {
        let key = keys::recording_stats(session);
        let bytes = self.download_bytes(container, &key).await?;
        let stats: RecordingStats = serde_json::from_slice(&bytes)?;
        Ok(stats)
    }

    /// Persist the terminal job-result document for a session.
    pub async fn write_job_result(
        &self,
        container: &str,
        session: &SessionId,
        result: &JobResult,
    ) -> StorageResult<()> {
        let key = keys::job_result(session);
        let json = serde_json::to_vec(result)?;
        self.upload_bytes(container, &key, json, "application/json")
            .await?;
        info!(session_id = %session, "Wrote terminal document to {}", key);
        Ok(())
    }

    /// Load the terminal job-result document, if one exists yet.
    pub async fn load_job_result(
        &self,
        container: &str,
        session: &SessionId,
    ) -> StorageResult<Option<JobResult>> {
        let key = keys::job_result(session);
        match self.download_bytes(container, &key).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Upload the final artifact, returning its key.
    pub async fn upload_artifact(
        &self,
        container: &str,
        output_folder: &str,
        session: &SessionId,
        path: impl AsRef<Path>,
    ) -> StorageResult<String> {
        let key = keys::output_artifact(output_folder, session);
        self.upload_file(container, &key, path, "video/mp4").await?;
        info!(session_id = %session, "Uploaded artifact to {}", key);
        Ok(key)
    }

    /// Public reference for a published artifact.
    pub async fn artifact_url(
        &self,
        container: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.presign_get(container, key, expires_in).await
    }
}
