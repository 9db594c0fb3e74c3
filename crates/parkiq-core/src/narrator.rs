//! Clinical narrative generation.
//!
//! The narrator is a pure, deterministic function of the fused verdict.
//! Confidence tiers are fixed constants rather than configuration so the
//! produced language is stable and testable.

use serde::{Deserialize, Serialize};

use crate::fusion::FusionVerdict;
use crate::modality::Modality;
use crate::result::{ModalityResult, Prediction};

/// Confidence above this reads as "high confidence".
pub const HIGH_CONFIDENCE: f64 = 0.8;
/// Confidence above this (and below high) reads as "moderate confidence".
pub const MODERATE_CONFIDENCE: f64 = 0.6;
/// Confidence above this selects the stronger positive action items.
const ACTION_CONFIDENCE: f64 = 0.7;

/// Human-readable derivation of a fusion verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNarrative {
    /// One-paragraph summary of the fused assessment.
    pub clinical_summary: String,
    /// Ordered action items: confidence-tier items, then one per
    /// contributing modality in canonical order, then two general items.
    pub recommendations: Vec<String>,
}

/// Derives summaries and recommendations from fused verdicts.
pub struct ClinicalNarrator;

impl ClinicalNarrator {
    /// Produce the narrative for a fused verdict.
    ///
    /// The verdict already carries the contributing-modality set, which is
    /// everything the summary and recommendations branch on. Per-result
    /// wording lives in [`ClinicalNarrator::modality_notes`].
    pub fn narrate(verdict: &FusionVerdict) -> ClinicalNarrative {
        ClinicalNarrative {
            clinical_summary: Self::summary(verdict),
            recommendations: Self::recommendations(verdict),
        }
    }

    fn confidence_tier(confidence: f64) -> &'static str {
        if confidence > HIGH_CONFIDENCE {
            "high confidence"
        } else if confidence > MODERATE_CONFIDENCE {
            "moderate confidence"
        } else {
            "low confidence"
        }
    }

    fn summary(verdict: &FusionVerdict) -> String {
        match verdict.prediction {
            Prediction::Parkinsons => {
                let mut summary = format!(
                    "Multi-modal analysis indicates {} for Parkinson's Disease (probability: {:.1}%). ",
                    Self::confidence_tier(verdict.confidence),
                    verdict.probability_pd * 100.0,
                );
                for modality in &verdict.contributing_modalities {
                    summary.push_str(Self::positive_sentence(*modality));
                }
                summary.trim_end().to_string()
            }
            Prediction::Healthy => {
                let mut summary = if verdict.confidence > HIGH_CONFIDENCE {
                    format!(
                        "Multi-modal analysis shows no significant indicators of Parkinson's Disease (confidence: {:.1}%). ",
                        verdict.confidence * 100.0,
                    )
                } else {
                    "Multi-modal analysis suggests healthy status, though with limited confidence. "
                        .to_string()
                };
                summary.push_str("All analyzed modalities are within normal ranges.");
                summary
            }
        }
    }

    fn positive_sentence(modality: Modality) -> &'static str {
        match modality {
            Modality::Voice => "Voice analysis reveals characteristic vocal changes. ",
            Modality::Datscan => "DATScan imaging shows reduced dopamine transporter activity. ",
            Modality::Spiral => "Spiral drawing demonstrates motor control deficits. ",
        }
    }

    fn modality_action(modality: Modality) -> &'static str {
        match modality {
            Modality::Voice => "Voice changes warrant speech therapy evaluation",
            Modality::Datscan => "DATScan results support clinical diagnosis",
            Modality::Spiral => "Motor assessment indicates need for physical therapy",
        }
    }

    fn recommendations(verdict: &FusionVerdict) -> Vec<String> {
        let mut recommendations = Vec::new();

        match verdict.prediction {
            Prediction::Parkinsons => {
                if verdict.confidence > ACTION_CONFIDENCE {
                    recommendations.push("Schedule comprehensive neurological evaluation".into());
                    recommendations
                        .push("Consider referral to movement disorder specialist".into());
                    recommendations.push("Begin baseline motor function assessment".into());
                } else {
                    recommendations.push("Schedule follow-up evaluation for confirmation".into());
                    recommendations.push("Monitor for symptom progression".into());
                    recommendations.push("Consider additional diagnostic testing".into());
                }
            }
            Prediction::Healthy => {
                if verdict.confidence > HIGH_CONFIDENCE {
                    recommendations.push("Continue routine health monitoring".into());
                    recommendations.push("No immediate follow-up required".into());
                } else {
                    recommendations.push("Consider repeat testing in 6-12 months".into());
                    recommendations.push("Monitor for new symptoms".into());
                }
            }
        }

        // BTreeSet iteration already follows the canonical modality order.
        for modality in &verdict.contributing_modalities {
            recommendations.push(Self::modality_action(*modality).into());
        }

        recommendations.push("Maintain regular exercise routine".into());
        recommendations.push("Schedule annual neurological check-up".into());

        recommendations
    }

    /// Per-modality clinical notes for single-modality responses.
    pub fn modality_notes(result: &ModalityResult) -> String {
        let tier = Self::confidence_tier(result.confidence);
        match (result.modality, result.prediction) {
            (Modality::Datscan, Prediction::Parkinsons) => {
                let mut notes = format!(
                    "DATScan analysis shows {} for reduced dopamine transporter activity in the striatum (probability: {:.1}%). ",
                    tier,
                    result.probability_pd * 100.0,
                );
                if result.probability_pd > 0.7 {
                    notes.push_str(
                        "Significant reduction in striatal uptake consistent with PD diagnosis.",
                    );
                } else {
                    notes.push_str(
                        "Moderate reduction in striatal uptake suggestive of early PD.",
                    );
                }
                notes
            }
            (Modality::Datscan, Prediction::Healthy) => {
                if result.confidence > HIGH_CONFIDENCE {
                    format!(
                        "DATScan analysis shows normal dopamine transporter activity in the striatum (confidence: {:.1}%). No significant abnormalities detected.",
                        result.confidence * 100.0,
                    )
                } else {
                    "DATScan analysis suggests normal dopamine transporter activity, though with limited confidence. Clinical correlation recommended.".into()
                }
            }
            (Modality::Spiral, Prediction::Parkinsons) => format!(
                "Spiral drawing analysis shows {} for motor control deficits (probability: {:.1}%).",
                tier,
                result.probability_pd * 100.0,
            ),
            (Modality::Spiral, Prediction::Healthy) => {
                if result.confidence > HIGH_CONFIDENCE {
                    format!(
                        "Spiral drawing analysis shows normal motor control (confidence: {:.1}%). Drawing patterns are within normal ranges.",
                        result.confidence * 100.0,
                    )
                } else {
                    "Spiral drawing analysis suggests normal motor function, though with limited confidence. Clinical correlation recommended.".into()
                }
            }
            (Modality::Voice, Prediction::Parkinsons) => format!(
                "Voice analysis shows {} for vocal changes associated with Parkinson's Disease (probability: {:.1}%).",
                tier,
                result.probability_pd * 100.0,
            ),
            (Modality::Voice, Prediction::Healthy) => {
                if result.confidence > HIGH_CONFIDENCE {
                    format!(
                        "Voice analysis indicates healthy vocal characteristics (confidence: {:.1}%). No concerning patterns detected.",
                        result.confidence * 100.0,
                    )
                } else {
                    "Voice analysis suggests generally healthy vocal patterns, though with limited confidence. Clinical correlation recommended.".into()
                }
            }
        }
    }
}
