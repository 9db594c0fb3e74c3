//! The modality predictor capability.

use async_trait::async_trait;

use parkiq_core::{FeatureSnapshot, Modality, ModalityResult};

use crate::error::ModelResult;

/// A trained (or stand-in) classifier for one modality.
///
/// Implementations are loaded once at startup, treated as read-only, and
/// shared across concurrent requests. `predict` may suspend (model I/O),
/// but must be independent of any other in-flight prediction: the
/// orchestrator fans predictors out concurrently and isolates their
/// failures from each other.
#[async_trait]
pub trait ModalityPredictor: Send + Sync {
    /// Which modality this predictor serves.
    fn modality(&self) -> Modality;

    /// Classify a feature vector into a [`ModalityResult`].
    ///
    /// The returned result must satisfy the `ModalityResult` invariants;
    /// the orchestrator re-validates and treats a violation as this
    /// modality's failure.
    async fn predict(&self, features: &FeatureSnapshot) -> ModelResult<ModalityResult>;
}
