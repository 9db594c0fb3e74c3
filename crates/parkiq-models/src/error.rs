//! Error types for model operations.

use thiserror::Error;

use parkiq_core::{Modality, ValidationError};

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the modality capability layer.
///
/// Each variant names the modality it belongs to: the orchestrator recovers
/// from these per modality, excluding the failed one from fusion while the
/// others proceed.
#[derive(Error, Debug, Clone)]
pub enum ModelError {
    /// The modality's model was never loaded into the registry.
    #[error("{modality} model is not loaded")]
    NotLoaded { modality: Modality },

    /// Loading a model artifact failed at startup.
    #[error("failed to load {modality} model: {reason}")]
    Load { modality: Modality, reason: String },

    /// The raw input could not be turned into a feature vector.
    #[error("{modality} feature extraction failed: {reason}")]
    Extraction { modality: Modality, reason: String },

    /// The classifier rejected the feature vector or produced an invalid
    /// result.
    #[error("{modality} prediction failed: {reason}")]
    Prediction { modality: Modality, reason: String },

    /// The input's shape does not match this modality.
    #[error("unsupported {modality} input: {reason}")]
    UnsupportedInput { modality: Modality, reason: String },

    /// Inference exceeded its per-modality budget.
    #[error("{modality} analysis timed out after {seconds:.1}s")]
    Timeout { modality: Modality, seconds: f64 },
}

impl ModelError {
    /// Which modality this error belongs to.
    pub fn modality(&self) -> Modality {
        match self {
            ModelError::NotLoaded { modality }
            | ModelError::Load { modality, .. }
            | ModelError::Extraction { modality, .. }
            | ModelError::Prediction { modality, .. }
            | ModelError::UnsupportedInput { modality, .. }
            | ModelError::Timeout { modality, .. } => *modality,
        }
    }

    /// Wrap a core validation error as a prediction failure.
    ///
    /// A predictor that emits an invariant-violating result is treated as
    /// that modality's failure, not as a caller error.
    pub fn from_invalid_result(modality: Modality, err: ValidationError) -> Self {
        ModelError::Prediction {
            modality,
            reason: err.to_string(),
        }
    }
}
