//! Response bodies for the analysis endpoints.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use parkiq_core::{ClinicalNarrator, FusionConfig, ModalityResult};

use crate::runtime::orchestrator::{AnalysisReport, ModalityFailure};

/// One named feature value surfaced for explainability.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeatureValue {
    pub feature_name: String,
    pub value: f64,
}

/// One modality's analysis result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModalityAnalysisResponse {
    pub modality: String,
    /// 0 = healthy, 1 = parkinsons.
    pub prediction: u8,
    pub prediction_label: String,
    pub confidence: f64,
    pub probability_pd: f64,
    pub probability_healthy: f64,
    pub processing_time_seconds: f64,
    pub clinical_notes: String,
    /// Leading entries of the feature snapshot, in extraction order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_features: Vec<FeatureValue>,
}

impl ModalityAnalysisResponse {
    const KEY_FEATURE_LIMIT: usize = 10;

    /// Build the response view of a modality result.
    pub fn from_result(result: &ModalityResult) -> Self {
        Self {
            modality: result.modality.name().to_string(),
            prediction: result.prediction.as_u8(),
            prediction_label: result.prediction.label().to_string(),
            confidence: result.confidence,
            probability_pd: result.probability_pd,
            probability_healthy: result.probability_healthy,
            processing_time_seconds: result.processing_time_seconds,
            clinical_notes: ClinicalNarrator::modality_notes(result),
            key_features: result
                .feature_snapshot
                .iter()
                .take(Self::KEY_FEATURE_LIMIT)
                .map(|(name, value)| FeatureValue {
                    feature_name: name.to_string(),
                    value,
                })
                .collect(),
        }
    }
}

/// One excluded modality and the reason it was skipped.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModalityErrorEntry {
    pub modality: String,
    pub message: String,
}

impl From<&ModalityFailure> for ModalityErrorEntry {
    fn from(failure: &ModalityFailure) -> Self {
        Self {
            modality: failure.modality.name().to_string(),
            message: failure.message.clone(),
        }
    }
}

/// The multimodal endpoint's response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MultimodalAnalysisResponse {
    /// 0 = healthy, 1 = parkinsons.
    pub fusion_prediction: u8,
    pub fusion_prediction_label: String,
    pub fusion_confidence: f64,
    pub fusion_probability_pd: f64,
    pub fusion_probability_healthy: f64,
    /// True only when no modality contributed a usable result.
    pub insufficient_data: bool,
    /// Raw per-modality results, keyed by modality name.
    pub individual_results: BTreeMap<String, ModalityAnalysisResponse>,
    /// Base trust weights the fusion ran with.
    pub fusion_weights: BTreeMap<String, f64>,
    /// Modalities that produced a result, in canonical order.
    pub models_used: Vec<String>,
    /// Modalities that were skipped, and why. Null when everything ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ModalityErrorEntry>>,
    pub clinical_summary: String,
    pub recommendations: Vec<String>,
    /// Wall-clock seconds for the whole analysis.
    pub total_processing_time: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl MultimodalAnalysisResponse {
    /// Build the response view of a finished analysis.
    pub fn from_report(report: AnalysisReport, config: &FusionConfig) -> Self {
        let individual_results = report
            .results
            .iter()
            .map(|result| {
                (
                    result.modality.name().to_string(),
                    ModalityAnalysisResponse::from_result(result),
                )
            })
            .collect();

        let fusion_weights = config
            .base_weights()
            .iter()
            .map(|(modality, weight)| (modality.name().to_string(), *weight))
            .collect();

        let models_used = report
            .results
            .iter()
            .map(|result| result.modality.name().to_string())
            .collect();

        let errors = if report.failures.is_empty() {
            None
        } else {
            Some(report.failures.iter().map(ModalityErrorEntry::from).collect())
        };

        Self {
            fusion_prediction: report.verdict.prediction.as_u8(),
            fusion_prediction_label: report.verdict.label().to_string(),
            fusion_confidence: report.verdict.confidence,
            fusion_probability_pd: report.verdict.probability_pd,
            fusion_probability_healthy: report.verdict.probability_healthy,
            insufficient_data: report.verdict.insufficient_data,
            individual_results,
            fusion_weights,
            models_used,
            errors,
            clinical_summary: report.narrative.clinical_summary,
            recommendations: report.narrative.recommendations,
            total_processing_time: report.total_processing_time,
            timestamp: chrono::Utc::now(),
        }
    }
}
