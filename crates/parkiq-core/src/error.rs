//! Validation errors for the fusion domain.
//!
//! A [`ValidationError`] always means a caller handed us data that violates
//! a documented invariant. It is never produced for a modality that merely
//! failed; those are recorded per-modality and excluded from fusion.

use thiserror::Error;

use crate::modality::Modality;

/// Result type alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Invariant violations detected while constructing or fusing results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A probability or confidence fell outside the unit interval.
    #[error("{modality} {field} must lie in [0, 1], got {value}")]
    OutOfUnitRange {
        modality: Modality,
        field: &'static str,
        value: f64,
    },

    /// The two class probabilities do not sum to one.
    #[error("{modality} probabilities must sum to 1.0 within {tolerance}, got {sum}")]
    ProbabilitySum {
        modality: Modality,
        sum: f64,
        tolerance: f64,
    },

    /// Processing time cannot be negative.
    #[error("{modality} processing time must be non-negative, got {value}")]
    NegativeProcessingTime { modality: Modality, value: f64 },

    /// A configured base weight fell outside (0, 1].
    #[error("base weight for {modality} must lie in (0, 1], got {value}")]
    BaseWeight { modality: Modality, value: f64 },

    /// A known modality has no configured base weight.
    #[error("no base weight configured for {0}")]
    MissingBaseWeight(Modality),

    /// The decision threshold fell outside [0, 1].
    #[error("decision threshold must lie in [0, 1], got {0}")]
    DecisionThreshold(f64),

    /// A wire name did not match any known modality.
    #[error("unknown modality '{0}'")]
    UnknownModality(String),

    /// An analysis request carried no modality payload at all.
    #[error("at least one modality payload is required")]
    EmptyRequest,
}
