//! # Runtime Module
//!
//! The execution runtime for analysis requests. The orchestrator fans the
//! requested modalities out to their predictors, collects successes and
//! failures behind a barrier join, and hands the survivors to the fusion
//! engine; the surrounding modules adapt that pipeline to HTTP.

/// Runtime configuration.
pub mod config;
/// API documentation endpoints.
#[cfg(feature = "openapi")]
pub mod docs;
/// Unified error handling system.
pub mod error;
/// HTTP request handlers organized by functionality.
pub mod handlers;
/// Concurrent per-request modality orchestration.
pub mod orchestrator;
/// HTTP router configuration and route registration.
pub mod router;
/// Server state and serve loop.
pub mod service;
/// Type definitions for HTTP runtime (requests, responses, etc.).
pub mod types;
/// Upload decoding and temp-file spooling.
pub mod upload;

pub use config::HttpRuntimeConfig;
pub use error::{ErrorCode, ErrorResponse, RequestId, RuntimeError, RuntimeResult};
pub use orchestrator::{AnalysisOrchestrator, AnalysisReport, ModalityFailure};
pub use service::AnalysisRuntime;
pub use upload::{SpooledUpload, UploadError};
