//! Deterministic mock predictors.
//!
//! These stand in for trained classifiers behind the same
//! [`ModalityPredictor`] contract. Outputs are pure functions of the
//! feature vector (where a score needs pseudo-randomness it is seeded
//! from a digest of the aligned features), so repeated analyses of the
//! same input agree exactly. Every produced result satisfies the
//! `ModalityResult` invariants.

use std::time::Instant;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use parkiq_core::{FeatureSnapshot, Modality, ModalityResult, align};

use crate::error::{ModelError, ModelResult};
use crate::extractor::VOICE_FEATURE_NAMES;
use crate::predictor::ModalityPredictor;

/// Seed a generator from the aligned feature vector.
fn feature_seed(aligned: &[f64]) -> u64 {
    let mut hasher = Sha256::new();
    for value in aligned {
        hasher.update(value.to_le_bytes());
    }
    let digest = hasher.finalize();
    u64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}

/// Population standard deviation of a value slice.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn build_result(
    modality: Modality,
    probability_pd: f64,
    confidence: f64,
    features: &FeatureSnapshot,
    started: Instant,
) -> ModelResult<ModalityResult> {
    ModalityResult::new(modality, probability_pd, 1.0 - probability_pd, confidence)
        .map(|result| {
            result
                .with_features(features.clone())
                .with_processing_time(started.elapsed().as_secs_f64())
        })
        .map_err(|err| ModelError::from_invalid_result(modality, err))
}

/// Stand-in for the voice XGBoost classifier.
///
/// Reports `confidence = max(probability_pd, probability_healthy)`, the
/// definition the wrapped gradient-boosted model used.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockVoiceModel;

#[async_trait]
impl ModalityPredictor for MockVoiceModel {
    fn modality(&self) -> Modality {
        Modality::Voice
    }

    async fn predict(&self, features: &FeatureSnapshot) -> ModelResult<ModalityResult> {
        let started = Instant::now();
        let aligned = align(features, VOICE_FEATURE_NAMES);
        let mut rng = StdRng::seed_from_u64(feature_seed(&aligned));

        let probability_pd: f64 = rng.random_range(0.05..0.95);
        let confidence = probability_pd.max(1.0 - probability_pd);

        build_result(Modality::Voice, probability_pd, confidence, features, started)
    }
}

/// Stand-in for the spiral motor-control model.
///
/// Scores motor control, tremor severity, drawing consistency and drawing
/// time into a composite PD probability; confidence falls as the feature
/// values spread out.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSpiralModel;

impl MockSpiralModel {
    /// Unit-interval features whose spread drives the confidence score.
    const CONFIDENCE_FEATURES: &'static [&'static str] = &[
        "tremor_amplitude",
        "line_smoothness",
        "pressure_variation",
        "spiral_deviation",
        "curvature_variation",
        "drawing_consistency",
        "motor_control_score",
        "tremor_severity",
        "coordination_index",
        "fluidity_measure",
    ];

    fn time_factor(drawing_time: f64) -> f64 {
        if drawing_time < 15.0 {
            0.8
        } else if drawing_time > 60.0 {
            0.7
        } else {
            1.0
        }
    }
}

#[async_trait]
impl ModalityPredictor for MockSpiralModel {
    fn modality(&self) -> Modality {
        Modality::Spiral
    }

    async fn predict(&self, features: &FeatureSnapshot) -> ModelResult<ModalityResult> {
        let started = Instant::now();

        let motor_score = features.get("motor_control_score").unwrap_or(0.5);
        let tremor_score = features.get("tremor_severity").unwrap_or(0.5);
        let consistency_score = features.get("drawing_consistency").unwrap_or(0.5);
        let time_factor = features
            .get("drawing_time")
            .map(Self::time_factor)
            .unwrap_or(1.0);

        let probability_pd = ((1.0 - motor_score) * 0.4
            + tremor_score * 0.3
            + (1.0 - consistency_score) * 0.2
            + (1.0 - time_factor) * 0.1)
            .clamp(0.1, 0.9);

        // Confidence reads the spread of the unit-scaled motor features:
        // a consistent profile scores higher than a scattered one.
        let aligned = align(features, Self::CONFIDENCE_FEATURES);
        let confidence = (0.6 + (1.0 - std_dev(&aligned)) * 0.3).clamp(0.3, 0.95);

        build_result(
            Modality::Spiral,
            probability_pd,
            confidence,
            features,
            started,
        )
    }
}

/// Stand-in for the DaTscan deep-learning classifier.
///
/// Shifts a base PD probability by the embedding mean; wider embedding
/// spread reads as higher confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDatscanModel;

#[async_trait]
impl ModalityPredictor for MockDatscanModel {
    fn modality(&self) -> Modality {
        Modality::Datscan
    }

    async fn predict(&self, features: &FeatureSnapshot) -> ModelResult<ModalityResult> {
        let started = Instant::now();

        let embedding_mean = features.get("embedding_mean").unwrap_or(0.5);
        let embedding_std = features.get("embedding_std").unwrap_or(0.25);

        let probability_pd = (0.3 + embedding_mean * 0.4).clamp(0.1, 0.9);
        let confidence = (0.6 + embedding_std * 0.3).clamp(0.3, 0.95);

        build_result(
            Modality::Datscan,
            probability_pd,
            confidence,
            features,
            started,
        )
    }
}
