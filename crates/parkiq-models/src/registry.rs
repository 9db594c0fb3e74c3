//! The model registry.
//!
//! Models are loaded once at process startup and the registry is immutable
//! afterwards: it is handed to the orchestrator by reference-counted
//! injection, never reached through process-global state. Each modality is
//! independently gate-able: an analysis request for an unloaded modality
//! fails for that modality only.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use parkiq_core::Modality;

use crate::error::{ModelError, ModelResult};
use crate::extractor::{
    DatscanFeatureExtractor, FeatureExtractor, SpiralFeatureExtractor, VoiceFeatureExtractor,
};
use crate::mock::{MockDatscanModel, MockSpiralModel, MockVoiceModel};
use crate::predictor::ModalityPredictor;

/// Static metadata describing one loaded model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Classifier family, e.g. "XGBoost Classifier".
    pub model_type: String,
    /// Model artifact version.
    pub version: String,
    /// Held-out accuracy, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Held-out AUC, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auc_score: Option<f64>,
    /// The feature names the model consumes, in alignment order.
    pub feature_names: Vec<String>,
}

/// One modality's loaded capability set: extractor, predictor, metadata.
pub struct ModalityModel {
    extractor: Arc<dyn FeatureExtractor>,
    predictor: Arc<dyn ModalityPredictor>,
    info: ModelInfo,
}

impl std::fmt::Debug for ModalityModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalityModel")
            .field("modality", &self.predictor.modality())
            .field("info", &self.info)
            .finish()
    }
}

impl ModalityModel {
    /// Bundle an extractor/predictor pair with its metadata.
    ///
    /// The pair must serve the same modality; a mismatch is a load error.
    pub fn new(
        extractor: Arc<dyn FeatureExtractor>,
        predictor: Arc<dyn ModalityPredictor>,
        info: ModelInfo,
    ) -> ModelResult<Self> {
        if extractor.modality() != predictor.modality() {
            return Err(ModelError::Load {
                modality: predictor.modality(),
                reason: format!(
                    "extractor serves {}, predictor serves {}",
                    extractor.modality(),
                    predictor.modality()
                ),
            });
        }
        Ok(Self {
            extractor,
            predictor,
            info,
        })
    }

    /// Which modality this model serves.
    pub fn modality(&self) -> Modality {
        self.predictor.modality()
    }

    /// The feature extractor for this modality.
    pub fn extractor(&self) -> &Arc<dyn FeatureExtractor> {
        &self.extractor
    }

    /// The predictor for this modality.
    pub fn predictor(&self) -> &Arc<dyn ModalityPredictor> {
        &self.predictor
    }

    /// Static model metadata.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }
}

/// Immutable-after-load collection of modality models.
pub struct ModelRegistry {
    models: HashMap<Modality, ModalityModel>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.models)
            .finish()
    }
}

impl ModelRegistry {
    /// Start building a registry from explicit models.
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// Load the shipped models for all modalities.
    ///
    /// This is the startup-time gate: the service must not accept analysis
    /// requests until it succeeds.
    pub fn load() -> ModelResult<Self> {
        let registry = Self::builder()
            .with_model(ModalityModel::new(
                Arc::new(VoiceFeatureExtractor),
                Arc::new(MockVoiceModel),
                ModelInfo {
                    model_type: "XGBoost Classifier".into(),
                    version: "1.0.0".into(),
                    accuracy: Some(86.61),
                    auc_score: Some(90.5),
                    feature_names: VoiceFeatureExtractor
                        .feature_names()
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                },
            )?)
            .with_model(ModalityModel::new(
                Arc::new(DatscanFeatureExtractor),
                Arc::new(MockDatscanModel),
                ModelInfo {
                    model_type: "DATScan CNN".into(),
                    version: "1.0.0".into(),
                    accuracy: None,
                    auc_score: None,
                    feature_names: DatscanFeatureExtractor
                        .feature_names()
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                },
            )?)
            .with_model(ModalityModel::new(
                Arc::new(SpiralFeatureExtractor),
                Arc::new(MockSpiralModel),
                ModelInfo {
                    model_type: "Spiral Motor Analysis".into(),
                    version: "1.0.0".into(),
                    accuracy: None,
                    auc_score: None,
                    feature_names: SpiralFeatureExtractor
                        .feature_names()
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                },
            )?)
            .build()?;

        for modality in registry.loaded() {
            tracing::info!(modality = %modality, "model loaded");
        }
        Ok(registry)
    }

    /// Look up one modality's model.
    pub fn model(&self, modality: Modality) -> Option<&ModalityModel> {
        self.models.get(&modality)
    }

    /// Whether a modality's model is available.
    pub fn is_loaded(&self, modality: Modality) -> bool {
        self.models.contains_key(&modality)
    }

    /// Loaded modalities in canonical order.
    pub fn loaded(&self) -> Vec<Modality> {
        Modality::all()
            .iter()
            .copied()
            .filter(|modality| self.is_loaded(*modality))
            .collect()
    }

    /// Number of loaded models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model is loaded.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Builder collecting models before the registry is frozen.
#[derive(Default)]
pub struct ModelRegistryBuilder {
    models: HashMap<Modality, ModalityModel>,
}

impl ModelRegistryBuilder {
    /// Register one modality's model, replacing any earlier registration
    /// for the same modality.
    pub fn with_model(mut self, model: ModalityModel) -> Self {
        self.models.insert(model.modality(), model);
        self
    }

    /// Freeze the registry.
    ///
    /// At least one model must be present; an empty registry cannot serve
    /// any analysis and is a startup failure, not a degraded mode.
    pub fn build(self) -> ModelResult<ModelRegistry> {
        if self.models.is_empty() {
            return Err(ModelError::Load {
                modality: Modality::Voice,
                reason: "no modality models available".into(),
            });
        }
        Ok(ModelRegistry {
            models: self.models,
        })
    }
}
