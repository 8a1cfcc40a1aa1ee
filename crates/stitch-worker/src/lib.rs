//! Session compositing pipeline.
//!
//! This crate provides:
//! - Bounded-retry asset fetching
//! - Recording-metadata resolution
//! - Frame sequencing with gap repair
//! - Audio chunk collection
//! - The three-stage transcode driver and publisher
//! - The job orchestrator with its detached-task boundary

pub mod audio;
pub mod config;
pub mod error;
pub mod fetch;
pub mod frames;
pub mod metadata;
pub mod pipeline;
pub mod publish;

pub use config::WorkerConfig;
pub use error::{JobError, PipelineResult, TranscodeStage};
pub use fetch::{AssetFetcher, RetryPolicy};
pub use pipeline::{spawn, JobContext};
