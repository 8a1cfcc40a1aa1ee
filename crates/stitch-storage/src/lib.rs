//! S3-compatible blob storage client.
//!
//! This crate provides:
//! - Raw byte/file upload and download against any S3 API endpoint
//! - Deterministic key layout for session assets and documents
//! - Typed operations for the recording-stats and job-result documents
//! - Presigned URL generation for published artifacts

pub mod client;
pub mod error;
pub mod keys;
pub mod operations;

pub use client::{BlobClient, BlobConfig};
pub use error::{StorageError, StorageResult};
