//! HTTP front door for the framestitch pipeline.
//!
//! This crate provides:
//! - The render submit endpoint (accept, validate, detach, acknowledge)
//! - A terminal-document poll endpoint
//! - Health endpoints and request middleware

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
