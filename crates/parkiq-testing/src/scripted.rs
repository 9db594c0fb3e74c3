//! Scripted predictor doubles with call tracking.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use parkiq_core::{FeatureSnapshot, Modality, ModalityResult};
use parkiq_models::{
    FeatureExtractor, ModalityInput, ModalityModel, ModalityPredictor, ModelError, ModelInfo,
    ModelRegistry, ModelResult,
};

/// Build a valid modality result for test scenarios.
pub fn sample_result(modality: Modality, probability_pd: f64, confidence: f64) -> ModalityResult {
    ModalityResult::new(modality, probability_pd, 1.0 - probability_pd, confidence)
        .expect("test result satisfies invariants")
}

/// A predictor that returns a preset outcome and records its calls.
pub struct ScriptedPredictor {
    modality: Modality,
    script: Result<ModalityResult, String>,
    delay: Option<std::time::Duration>,
    call_count: Arc<Mutex<usize>>,
}

impl ScriptedPredictor {
    /// A predictor that always succeeds with the given probabilities.
    pub fn succeeding(modality: Modality, probability_pd: f64, confidence: f64) -> Self {
        Self {
            modality,
            script: Ok(sample_result(modality, probability_pd, confidence)),
            delay: None,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// A predictor that always succeeds with the given full result.
    pub fn returning(result: ModalityResult) -> Self {
        Self {
            modality: result.modality,
            script: Ok(result),
            delay: None,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// A predictor that always fails with the given message.
    pub fn failing(modality: Modality, message: impl Into<String>) -> Self {
        Self {
            modality,
            script: Err(message.into()),
            delay: None,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Delay each prediction, for exercising timeout handling.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle to this predictor's call counter.
    ///
    /// Clone it before handing the predictor to a registry; the count is
    /// observable afterwards through the clone.
    pub fn call_counter(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.call_count)
    }

    /// How many times `predict` has run.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ModalityPredictor for ScriptedPredictor {
    fn modality(&self) -> Modality {
        self.modality
    }

    async fn predict(&self, _features: &FeatureSnapshot) -> ModelResult<ModalityResult> {
        *self.call_count.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.script {
            Ok(result) => Ok(result.clone()),
            Err(message) => Err(ModelError::Prediction {
                modality: self.modality,
                reason: message.clone(),
            }),
        }
    }
}

/// An extractor that accepts any input for its modality and returns a
/// fixed snapshot.
pub struct StaticExtractor {
    modality: Modality,
    snapshot: FeatureSnapshot,
}

impl StaticExtractor {
    /// An extractor producing an empty snapshot.
    pub fn new(modality: Modality) -> Self {
        Self {
            modality,
            snapshot: FeatureSnapshot::new(),
        }
    }

    /// An extractor producing the given snapshot.
    pub fn with_snapshot(modality: Modality, snapshot: FeatureSnapshot) -> Self {
        Self { modality, snapshot }
    }
}

impl FeatureExtractor for StaticExtractor {
    fn modality(&self) -> Modality {
        self.modality
    }

    fn feature_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn extract(&self, input: &ModalityInput) -> ModelResult<FeatureSnapshot> {
        if input.modality() != self.modality {
            return Err(ModelError::UnsupportedInput {
                modality: self.modality,
                reason: format!("expected {} input", self.modality),
            });
        }
        Ok(self.snapshot.clone())
    }
}

/// Build a registry from scripted predictors, one per entry.
pub fn scripted_registry(
    predictors: impl IntoIterator<Item = ScriptedPredictor>,
) -> ModelRegistry {
    let mut builder = ModelRegistry::builder();
    for predictor in predictors {
        let modality = predictor.modality();
        let model = ModalityModel::new(
            Arc::new(StaticExtractor::new(modality)),
            Arc::new(predictor),
            ModelInfo {
                model_type: format!("scripted ({modality})"),
                version: "test".into(),
                accuracy: None,
                auc_score: None,
                feature_names: Vec::new(),
            },
        )
        .expect("scripted model bundles cleanly");
        builder = builder.with_model(model);
    }
    builder.build().expect("scripted registry is non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_predictor_replays_its_script_and_counts_calls() {
        let predictor = ScriptedPredictor::succeeding(Modality::Voice, 0.8, 0.9);
        let counter = predictor.call_counter();

        let result = predictor.predict(&FeatureSnapshot::new()).await.unwrap();
        assert_eq!(result.probability_pd, 0.8);
        assert_eq!(*counter.lock().unwrap(), 1);

        predictor.predict(&FeatureSnapshot::new()).await.unwrap();
        assert_eq!(predictor.call_count(), 2);
    }

    #[tokio::test]
    async fn failing_predictor_reports_prediction_error() {
        let predictor = ScriptedPredictor::failing(Modality::Datscan, "scan unreadable");
        let err = predictor
            .predict(&FeatureSnapshot::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Prediction { .. }));
        assert_eq!(err.modality(), Modality::Datscan);
    }
}
