//! Confidence-weighted late fusion.
//!
//! The fusion engine combines zero or more independently-produced
//! [`ModalityResult`]s into one [`FusionVerdict`]. Each result's influence
//! is its modality's base trust weight multiplied by that inference's
//! self-reported confidence, so a degraded signal is discounted without
//! being discarded. `fuse` is a pure function: identical inputs produce
//! identical outputs, in any input order.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::modality::Modality;
use crate::result::{ModalityResult, Prediction};

/// Tolerance for the probability-sum invariant.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Static fusion configuration, immutable after construction.
///
/// Serialize-only: deserializing would bypass the weight and threshold
/// validation in [`FusionConfig::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionConfig {
    base_weights: HashMap<Modality, f64>,
    decision_threshold: f64,
}

impl FusionConfig {
    /// Default base trust weights: imaging > drawing > voice.
    pub const DEFAULT_VOICE_WEIGHT: f64 = 0.20;
    pub const DEFAULT_DATSCAN_WEIGHT: f64 = 0.50;
    pub const DEFAULT_SPIRAL_WEIGHT: f64 = 0.30;

    /// Default decision threshold on the fused PD probability.
    pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

    /// Create a validated configuration.
    ///
    /// Every known modality must carry a weight in (0, 1]; the weights need
    /// not sum to 1 (they are normalized at fusion time). The threshold
    /// must lie in [0, 1].
    pub fn new(
        base_weights: HashMap<Modality, f64>,
        decision_threshold: f64,
    ) -> ValidationResult<Self> {
        for modality in Modality::all() {
            match base_weights.get(modality) {
                None => return Err(ValidationError::MissingBaseWeight(*modality)),
                Some(&weight) => {
                    if !(weight > 0.0 && weight <= 1.0) {
                        return Err(ValidationError::BaseWeight {
                            modality: *modality,
                            value: weight,
                        });
                    }
                }
            }
        }
        if !(0.0..=1.0).contains(&decision_threshold) {
            return Err(ValidationError::DecisionThreshold(decision_threshold));
        }
        Ok(Self {
            base_weights,
            decision_threshold,
        })
    }

    /// Base trust weight for a modality.
    pub fn base_weight(&self, modality: Modality) -> f64 {
        // Construction guarantees every known modality is present.
        self.base_weights.get(&modality).copied().unwrap_or(0.0)
    }

    /// All configured base weights.
    pub fn base_weights(&self) -> &HashMap<Modality, f64> {
        &self.base_weights
    }

    /// The decision threshold on the fused PD probability.
    pub fn decision_threshold(&self) -> f64 {
        self.decision_threshold
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        let base_weights = HashMap::from([
            (Modality::Voice, Self::DEFAULT_VOICE_WEIGHT),
            (Modality::Datscan, Self::DEFAULT_DATSCAN_WEIGHT),
            (Modality::Spiral, Self::DEFAULT_SPIRAL_WEIGHT),
        ]);
        Self {
            base_weights,
            decision_threshold: Self::DEFAULT_DECISION_THRESHOLD,
        }
    }
}

/// The fused assessment produced by one `fuse` call.
///
/// Created fresh per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionVerdict {
    /// Fused class decision.
    pub prediction: Prediction,
    /// Fused probability of the parkinsons class.
    pub probability_pd: f64,
    /// Fused probability of the healthy class; sums with `probability_pd` to 1.
    pub probability_healthy: f64,
    /// Arithmetic mean of the contributing results' confidences.
    pub confidence: f64,
    /// Modalities that carried non-zero effective weight.
    pub contributing_modalities: BTreeSet<Modality>,
    /// True only when no usable modality result was available.
    pub insufficient_data: bool,
}

impl FusionVerdict {
    /// Designed fallback when nothing usable was available to combine.
    fn insufficient() -> Self {
        Self {
            prediction: Prediction::Healthy,
            probability_pd: 0.5,
            probability_healthy: 0.5,
            confidence: 0.0,
            contributing_modalities: BTreeSet::new(),
            insufficient_data: true,
        }
    }

    /// Human-readable verdict label.
    pub fn label(&self) -> &'static str {
        if self.insufficient_data {
            "Insufficient Data"
        } else {
            self.prediction.label()
        }
    }
}

/// Combines per-modality results under confidence-weighted, modality-weighted
/// averaging. Owns no mutable state; safe to share across requests.
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    config: FusionConfig,
}

impl FusionEngine {
    /// Create an engine over the given configuration.
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine fuses under.
    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuse zero or more modality results into one verdict.
    ///
    /// Every input is re-validated; a malformed entry is rejected with a
    /// [`ValidationError`] rather than silently coerced. An empty input,
    /// or one whose results all carry zero confidence, takes the designed
    /// `insufficient_data` fallback instead of erroring, so callers can
    /// always render a verdict.
    pub fn fuse(&self, results: &[ModalityResult]) -> ValidationResult<FusionVerdict> {
        for result in results {
            result.validate()?;
        }

        // Accumulation follows the canonical modality order, so the verdict
        // is bit-identical regardless of the order results were collected.
        let mut ordered: Vec<&ModalityResult> = Vec::with_capacity(results.len());
        for modality in Modality::all() {
            ordered.extend(results.iter().filter(|r| r.modality == *modality));
        }

        let mut total_weighted_pd = 0.0;
        let mut total_weight = 0.0;
        let mut total_confidence = 0.0;
        let mut contributing = BTreeSet::new();
        let mut contributors = 0usize;

        for result in ordered {
            let effective_weight = self.config.base_weight(result.modality) * result.confidence;
            if effective_weight <= 0.0 {
                continue;
            }
            total_weighted_pd += result.probability_pd * effective_weight;
            total_weight += effective_weight;
            total_confidence += result.confidence;
            contributing.insert(result.modality);
            contributors += 1;
        }

        if total_weight <= 0.0 {
            return Ok(FusionVerdict::insufficient());
        }

        let probability_pd = total_weighted_pd / total_weight;
        // Reported confidence is the plain mean of input confidences,
        // deliberately decoupled from the weighting: a high-base-weight but
        // low-confidence modality must not inflate displayed confidence.
        let confidence = total_confidence / contributors as f64;

        Ok(FusionVerdict {
            prediction: Prediction::from_probability(
                probability_pd,
                self.config.decision_threshold(),
            ),
            probability_pd,
            probability_healthy: 1.0 - probability_pd,
            confidence,
            contributing_modalities: contributing,
            insufficient_data: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(modality: Modality, probability_pd: f64, confidence: f64) -> ModalityResult {
        ModalityResult::new(modality, probability_pd, 1.0 - probability_pd, confidence)
            .expect("valid result")
    }

    #[test]
    fn fuses_voice_and_datscan_with_effective_weights() {
        // Effective weights 0.20*0.9 = 0.18 and 0.50*0.5 = 0.25; weighted
        // sum 0.8*0.18 + 0.3*0.25 = 0.219 over total weight 0.43.
        let engine = FusionEngine::default();
        let verdict = engine
            .fuse(&[
                result(Modality::Voice, 0.8, 0.9),
                result(Modality::Datscan, 0.3, 0.5),
            ])
            .unwrap();

        assert!((verdict.probability_pd - 0.219 / 0.43).abs() < 1e-12);
        assert!((verdict.probability_pd - 0.5093).abs() < 1e-4);
        assert_eq!(verdict.prediction, Prediction::Parkinsons);
        assert!((verdict.confidence - 0.7).abs() < 1e-12);
        assert!(!verdict.insufficient_data);
        assert_eq!(
            verdict.contributing_modalities,
            BTreeSet::from([Modality::Voice, Modality::Datscan])
        );
    }

    #[test]
    fn single_modality_passes_probability_through_exactly() {
        let engine = FusionEngine::default();
        let verdict = engine.fuse(&[result(Modality::Spiral, 0.4, 0.6)]).unwrap();

        assert_eq!(verdict.probability_pd, 0.4);
        assert_eq!(verdict.probability_healthy, 1.0 - 0.4);
        assert_eq!(verdict.confidence, 0.6);
        assert_eq!(verdict.prediction, Prediction::Healthy);
    }

    #[test]
    fn empty_input_yields_insufficient_data_fallback() {
        let engine = FusionEngine::default();
        let verdict = engine.fuse(&[]).unwrap();

        assert!(verdict.insufficient_data);
        assert_eq!(verdict.probability_pd, 0.5);
        assert_eq!(verdict.probability_healthy, 0.5);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.prediction, Prediction::Healthy);
        assert!(verdict.contributing_modalities.is_empty());
        assert_eq!(verdict.label(), "Insufficient Data");
    }

    #[test]
    fn zero_confidence_results_carry_no_weight() {
        let engine = FusionEngine::default();
        let verdict = engine.fuse(&[result(Modality::Datscan, 0.9, 0.0)]).unwrap();

        assert!(verdict.insufficient_data);
        assert_eq!(verdict.probability_pd, 0.5);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.contributing_modalities.is_empty());
    }

    #[test]
    fn zero_confidence_result_is_ignored_next_to_a_usable_one() {
        let engine = FusionEngine::default();
        let verdict = engine
            .fuse(&[
                result(Modality::Datscan, 0.9, 0.0),
                result(Modality::Spiral, 0.4, 0.6),
            ])
            .unwrap();

        assert_eq!(verdict.probability_pd, 0.4);
        assert_eq!(verdict.confidence, 0.6);
        assert_eq!(
            verdict.contributing_modalities,
            BTreeSet::from([Modality::Spiral])
        );
    }

    #[test]
    fn exact_threshold_resolves_healthy() {
        // Both results sit exactly on the threshold, so the weighted average
        // lands on it exactly; the strict comparison must resolve healthy.
        let engine = FusionEngine::default();
        let verdict = engine
            .fuse(&[
                result(Modality::Voice, 0.5, 0.9),
                result(Modality::Datscan, 0.5, 0.4),
            ])
            .unwrap();

        assert_eq!(verdict.probability_pd, 0.5);
        assert_eq!(verdict.prediction, Prediction::Healthy);
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let engine = FusionEngine::default();
        let a = result(Modality::Voice, 0.8, 0.9);
        let b = result(Modality::Datscan, 0.3, 0.5);
        let c = result(Modality::Spiral, 0.6, 0.7);

        let forward = engine.fuse(&[a.clone(), b.clone(), c.clone()]).unwrap();
        let rotated = engine.fuse(&[c.clone(), a.clone(), b.clone()]).unwrap();
        let swapped = engine.fuse(&[b, c, a]).unwrap();

        assert_eq!(forward, rotated);
        assert_eq!(forward, swapped);
    }

    #[test]
    fn rejects_malformed_input() {
        let engine = FusionEngine::default();
        let mut bad = result(Modality::Voice, 0.8, 0.9);
        bad.probability_healthy = 0.9;

        let err = engine.fuse(&[bad]).unwrap_err();
        assert!(matches!(err, ValidationError::ProbabilitySum { .. }));
    }

    #[test]
    fn higher_confidence_pulls_the_verdict_toward_that_result() {
        let engine = FusionEngine::default();
        let base = engine
            .fuse(&[
                result(Modality::Voice, 0.9, 0.5),
                result(Modality::Datscan, 0.2, 0.8),
            ])
            .unwrap();
        let boosted = engine
            .fuse(&[
                result(Modality::Voice, 0.9, 0.7),
                result(Modality::Datscan, 0.2, 0.8),
            ])
            .unwrap();

        // The voice result sits above the fused probability, so raising its
        // confidence must strictly raise the fused probability.
        assert!(boosted.probability_pd > base.probability_pd);
    }

    #[test]
    fn config_rejects_bad_weights_and_thresholds() {
        let mut weights = FusionConfig::default().base_weights().clone();
        weights.insert(Modality::Voice, 0.0);
        assert!(matches!(
            FusionConfig::new(weights.clone(), 0.5),
            Err(ValidationError::BaseWeight { .. })
        ));

        weights.insert(Modality::Voice, 0.2);
        assert!(matches!(
            FusionConfig::new(weights.clone(), 1.5),
            Err(ValidationError::DecisionThreshold(_))
        ));

        weights.remove(&Modality::Spiral);
        assert!(matches!(
            FusionConfig::new(weights, 0.5),
            Err(ValidationError::MissingBaseWeight(Modality::Spiral))
        ));
    }
}
