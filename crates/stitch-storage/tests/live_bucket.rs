//! Live blob-store integration tests.
//!
//! These tests require an S3-compatible endpoint and credentials. Run with:
//! `cargo test -p stitch-storage -- --ignored`

use std::time::Duration;

use stitch_models::{JobResult, SessionId, VideoShape};
use stitch_storage::BlobClient;

fn test_container() -> String {
    std::env::var("BLOB_TEST_CONTAINER").unwrap_or_else(|_| "framestitch-test".to_string())
}

#[tokio::test]
#[ignore = "requires blob store credentials"]
async fn test_connectivity() {
    dotenvy::dotenv().ok();

    let client = BlobClient::from_env().expect("Failed to create blob client");
    client
        .check_connectivity(&test_container())
        .await
        .expect("Failed to reach blob store");
}

#[tokio::test]
#[ignore = "requires blob store credentials"]
async fn test_presigned_url() {
    dotenvy::dotenv().ok();

    let client = BlobClient::from_env().expect("Failed to create blob client");
    let url = client
        .presign_get(
            &test_container(),
            "integration/test.mp4",
            Duration::from_secs(3600),
        )
        .await
        .expect("Failed to generate presigned URL");

    assert!(url.contains("X-Amz-Signature"));
}

#[tokio::test]
#[ignore = "requires blob store credentials"]
async fn test_job_result_round_trip() {
    dotenvy::dotenv().ok();

    let client = BlobClient::from_env().expect("Failed to create blob client");
    let container = test_container();
    let session = SessionId::from_string("integration-test-session");

    let result = JobResult::completed(
        "videos/integration-test-session.mp4",
        "https://example.invalid/artifact",
        VideoShape::for_crop(false),
    );

    client
        .write_job_result(&container, &session, &result)
        .await
        .expect("Failed to write job result");

    let loaded = client
        .load_job_result(&container, &session)
        .await
        .expect("Failed to load job result")
        .expect("Job result missing after write");

    assert!(loaded.is_completed());
}

#[tokio::test]
#[ignore = "requires blob store credentials"]
async fn test_artifact_upload() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    dotenvy::dotenv().ok();

    let client = BlobClient::from_env().expect("Failed to create blob client");
    let container = test_container();
    let session = SessionId::from_string("integration-test-artifact");

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(b"not really an mp4")
        .expect("Failed to write temp file");

    let key = client
        .upload_artifact(&container, "videos", &session, temp_file.path())
        .await
        .expect("Failed to upload artifact");

    assert_eq!(key, "videos/integration-test-artifact.mp4");

    let url = client
        .artifact_url(&container, &key, Duration::from_secs(600))
        .await
        .expect("Failed to presign artifact");
    assert!(url.contains(&key));
}

#[tokio::test]
#[ignore = "requires blob store credentials"]
async fn test_missing_job_result_is_none() {
    dotenvy::dotenv().ok();

    let client = BlobClient::from_env().expect("Failed to create blob client");
    let session = SessionId::from_string("no-such-session");

    let loaded = client
        .load_job_result(&test_container(), &session)
        .await
        .expect("Lookup should not error");

    assert!(loaded.is_none());
}
