//! Health and model-information endpoints.

use axum::{extract::State, http::StatusCode, response::Json};
use std::time::Instant;

use parkiq_core::Modality;

use crate::runtime::service::AnalysisRuntime;

// Track service start time for uptime calculation
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    START_TIME.get_or_init(Instant::now).elapsed().as_secs()
}

/// GET /health - Basic health check endpoint with model readiness
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health_check(
    State(runtime): State<AnalysisRuntime>,
) -> (StatusCode, Json<serde_json::Value>) {
    let models: serde_json::Map<String, serde_json::Value> = Modality::all()
        .iter()
        .map(|modality| {
            (
                modality.name().to_string(),
                serde_json::Value::Bool(runtime.registry.is_loaded(*modality)),
            )
        })
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "parkiq-http-runtime",
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_seconds": get_uptime_seconds(),
            "models": models,
            "timestamp": chrono::Utc::now(),
        })),
    )
}

/// GET /model-info - Metadata for every loaded model
#[utoipa::path(
    get,
    path = "/model-info",
    responses(
        (status = 200, description = "Model metadata", body = serde_json::Value),
        (status = 503, description = "No models loaded")
    )
)]
pub async fn model_info(
    State(runtime): State<AnalysisRuntime>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    if runtime.registry.is_empty() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "detail": "No models loaded" })),
        ));
    }

    const SAMPLE_FEATURES: usize = 10;

    let mut models = serde_json::Map::new();
    for modality in runtime.registry.loaded() {
        let Some(model) = runtime.registry.model(modality) else {
            continue;
        };
        let info = model.info();
        models.insert(
            modality.name().to_string(),
            serde_json::json!({
                "model_type": info.model_type,
                "version": info.version,
                "accuracy": info.accuracy,
                "auc_score": info.auc_score,
                "features_count": info.feature_names.len(),
                "sample_features": info.feature_names.iter().take(SAMPLE_FEATURES).collect::<Vec<_>>(),
            }),
        );
    }

    Ok(Json(serde_json::json!({
        "models": models,
        "loaded_modalities": runtime
            .registry
            .loaded()
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>(),
        "fusion_weights": runtime
            .orchestrator
            .fusion()
            .config()
            .base_weights()
            .iter()
            .map(|(modality, weight)| (modality.name().to_string(), *weight))
            .collect::<std::collections::BTreeMap<_, _>>(),
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// GET /features - Catalog of analyzed voice features
#[utoipa::path(
    get,
    path = "/features",
    responses(
        (status = 200, description = "Voice feature catalog", body = serde_json::Value)
    )
)]
pub async fn features_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "feature_categories": {
            "pitch_features": ["pitch_mean", "pitch_std", "pitch_min", "pitch_max"],
            "voice_quality": ["jitter_percent", "shimmer_percent", "hnr"],
            "formant_features": ["formant_f1_mean", "formant_f2_mean"],
            "spectral_features": ["spectral_centroid_mean", "spectral_rolloff_mean"],
            "mfcc_features": (1..=13).map(|i| format!("mfcc_{i}")).collect::<Vec<_>>(),
        },
        "clinical_relevance": {
            "jitter": "Measures vocal cord stability - higher in PD",
            "shimmer": "Measures amplitude variation - irregular in PD",
            "hnr": "Harmonics-to-noise ratio - lower in PD (breathier voice)",
            "pitch": "Fundamental frequency analysis - reduced range in PD",
        },
    }))
}
