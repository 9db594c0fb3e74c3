//! # ParkIQ HTTP Runtime
//!
//! Serves the multimodal analysis pipeline over a REST API: per-modality
//! endpoints with hard failure semantics, and a multimodal endpoint that
//! degrades gracefully: partial modality failures become data in the
//! response, never a failed request.

pub mod runtime;

pub use runtime::{
    AnalysisOrchestrator, AnalysisReport, AnalysisRuntime, HttpRuntimeConfig, ModalityFailure,
    RequestId, RuntimeError, RuntimeResult,
};
