//! Per-modality prediction results.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::features::FeatureSnapshot;
use crate::fusion::PROBABILITY_TOLERANCE;
use crate::modality::Modality;

/// Binary screening outcome.
///
/// Serialized as `0` (healthy) / `1` (parkinsons) to match the classifier
/// convention used throughout the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Prediction {
    Healthy,
    Parkinsons,
}

impl Prediction {
    /// Apply a decision threshold to a PD probability.
    ///
    /// The comparison is strictly greater-than: a probability exactly equal
    /// to the threshold resolves to [`Prediction::Healthy`].
    pub fn from_probability(probability_pd: f64, threshold: f64) -> Self {
        if probability_pd > threshold {
            Prediction::Parkinsons
        } else {
            Prediction::Healthy
        }
    }

    /// Human-readable class label.
    pub fn label(&self) -> &'static str {
        match self {
            Prediction::Healthy => "Healthy",
            Prediction::Parkinsons => "Parkinson's Disease",
        }
    }

    /// Wire representation.
    pub fn as_u8(&self) -> u8 {
        (*self).into()
    }
}

impl From<Prediction> for u8 {
    fn from(prediction: Prediction) -> u8 {
        match prediction {
            Prediction::Healthy => 0,
            Prediction::Parkinsons => 1,
        }
    }
}

impl TryFrom<u8> for Prediction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Prediction::Healthy),
            1 => Ok(Prediction::Parkinsons),
            other => Err(format!("prediction must be 0 or 1, got {other}")),
        }
    }
}

/// The output of one modality predictor for one analysis request.
///
/// Instances are immutable after creation and live only for the duration of
/// the request that produced them. Construct through [`ModalityResult::new`]
/// so the probability-sum and range invariants hold from the start; the
/// fusion engine re-checks them on every input it is handed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityResult {
    /// Which modality produced this result.
    pub modality: Modality,
    /// Class decision at the 0.5 per-modality threshold.
    pub prediction: Prediction,
    /// Probability of the parkinsons class, in [0, 1].
    pub probability_pd: f64,
    /// Probability of the healthy class; sums with `probability_pd` to 1.
    pub probability_healthy: f64,
    /// Self-reported reliability of this inference, in [0, 1].
    ///
    /// Not a class probability: it scales this result's influence during
    /// fusion.
    pub confidence: f64,
    /// Wall-clock seconds the predictor spent. Informational only.
    pub processing_time_seconds: f64,
    /// Named features captured for explainability. Never consumed by fusion.
    #[serde(default, skip_serializing_if = "FeatureSnapshot::is_empty")]
    pub feature_snapshot: FeatureSnapshot,
}

impl ModalityResult {
    /// Create a validated result.
    ///
    /// The prediction is derived from `probability_pd` at the conventional
    /// 0.5 per-modality threshold.
    pub fn new(
        modality: Modality,
        probability_pd: f64,
        probability_healthy: f64,
        confidence: f64,
    ) -> ValidationResult<Self> {
        let result = Self {
            modality,
            prediction: Prediction::from_probability(probability_pd, 0.5),
            probability_pd,
            probability_healthy,
            confidence,
            processing_time_seconds: 0.0,
            feature_snapshot: FeatureSnapshot::new(),
        };
        result.validate()?;
        Ok(result)
    }

    /// Attach a feature snapshot for explainability output.
    pub fn with_features(mut self, snapshot: FeatureSnapshot) -> Self {
        self.feature_snapshot = snapshot;
        self
    }

    /// Record how long the predictor ran.
    pub fn with_processing_time(mut self, seconds: f64) -> Self {
        self.processing_time_seconds = seconds;
        self
    }

    /// Check every documented invariant.
    ///
    /// NaN fails the range checks, so non-finite values can never pass.
    pub fn validate(&self) -> ValidationResult<()> {
        for (field, value) in [
            ("probability_pd", self.probability_pd),
            ("probability_healthy", self.probability_healthy),
            ("confidence", self.confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::OutOfUnitRange {
                    modality: self.modality,
                    field,
                    value,
                });
            }
        }

        let sum = self.probability_pd + self.probability_healthy;
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ValidationError::ProbabilitySum {
                modality: self.modality,
                sum,
                tolerance: PROBABILITY_TOLERANCE,
            });
        }

        if self.processing_time_seconds.is_nan() || self.processing_time_seconds < 0.0 {
            return Err(ValidationError::NegativeProcessingTime {
                modality: self.modality,
                value: self.processing_time_seconds,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_prediction_at_half_threshold() {
        let pd = ModalityResult::new(Modality::Voice, 0.8, 0.2, 0.9).unwrap();
        assert_eq!(pd.prediction, Prediction::Parkinsons);

        let healthy = ModalityResult::new(Modality::Spiral, 0.4, 0.6, 0.6).unwrap();
        assert_eq!(healthy.prediction, Prediction::Healthy);

        // Exactly 0.5 resolves healthy.
        let tie = ModalityResult::new(Modality::Datscan, 0.5, 0.5, 0.7).unwrap();
        assert_eq!(tie.prediction, Prediction::Healthy);
    }

    #[test]
    fn rejects_probabilities_that_do_not_sum_to_one() {
        let err = ModalityResult::new(Modality::Voice, 0.8, 0.1, 0.9).unwrap_err();
        assert!(matches!(err, ValidationError::ProbabilitySum { .. }));
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let err = ModalityResult::new(Modality::Datscan, 0.3, 0.7, 1.2).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfUnitRange {
                field: "confidence",
                ..
            }
        ));
    }

    #[test]
    fn rejects_nan_probability() {
        let err = ModalityResult::new(Modality::Spiral, f64::NAN, 0.5, 0.5).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfUnitRange { .. }));
    }

    #[test]
    fn rejects_negative_processing_time() {
        let result = ModalityResult::new(Modality::Voice, 0.5, 0.5, 0.5)
            .unwrap()
            .with_processing_time(-1.0);
        assert!(matches!(
            result.validate(),
            Err(ValidationError::NegativeProcessingTime { .. })
        ));
    }

    #[test]
    fn prediction_serializes_as_integer() {
        let result = ModalityResult::new(Modality::Voice, 0.8, 0.2, 0.9).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["prediction"], 1);
        assert_eq!(json["modality"], "voice");
    }
}
