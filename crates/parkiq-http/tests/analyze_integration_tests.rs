//! Integration tests for the analysis endpoints.
//!
//! Exercises the failure matrix end to end: partial modality failures keep
//! the multimodal endpoint at 200 with an `errors` array, while the
//! single-modality endpoints fail hard.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use parkiq_core::Modality;
use parkiq_http::AnalysisRuntime;
use parkiq_models::ModelRegistry;
use parkiq_testing::{ScriptedPredictor, scripted_registry};

// base64 of "fake-wav-bytes" / "fake-png-bytes"
const AUDIO_B64: &str = "ZmFrZS13YXYtYnl0ZXM=";
const IMAGE_B64: &str = "ZmFrZS1wbmctYnl0ZXM=";

fn app(registry: ModelRegistry) -> axum::Router {
    AnalysisRuntime::new(registry).router()
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn full_panel_registry() -> ModelRegistry {
    scripted_registry([
        ScriptedPredictor::succeeding(Modality::Voice, 0.8, 0.9),
        ScriptedPredictor::succeeding(Modality::Datscan, 0.3, 0.5),
        ScriptedPredictor::succeeding(Modality::Spiral, 0.4, 0.6),
    ])
}

#[tokio::test]
async fn multimodal_fuses_voice_and_datscan() {
    let (status, body) = post_json(
        app(full_panel_registry()),
        "/analyze/multimodal",
        json!({
            "voice": { "audio_data": AUDIO_B64 },
            "datscan": { "image_data": IMAGE_B64 },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Effective weights 0.18 / 0.25 put the fused probability near 0.5093.
    let probability = body["fusion_probability_pd"].as_f64().unwrap();
    assert!((probability - 0.5093).abs() < 1e-4);
    assert_eq!(body["fusion_prediction"], 1);
    assert_eq!(body["fusion_prediction_label"], "Parkinson's Disease");
    assert!((body["fusion_confidence"].as_f64().unwrap() - 0.7).abs() < 1e-9);
    assert_eq!(body["insufficient_data"], false);
    assert_eq!(body["models_used"], json!(["voice", "datscan"]));
    assert!(body["errors"].is_null());
    assert!(body["individual_results"]["voice"]["probability_pd"].is_number());
    assert!(body["total_processing_time"].as_f64().unwrap() >= 0.0);
    assert_eq!(body["fusion_weights"]["datscan"], 0.5);
    assert!(body["clinical_summary"].as_str().unwrap().len() > 10);
    assert!(body["recommendations"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn multimodal_single_spiral_passes_probability_through() {
    let (status, body) = post_json(
        app(full_panel_registry()),
        "/analyze/multimodal",
        json!({ "spiral": { "spiral_data": IMAGE_B64, "drawing_time": 30.0 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fusion_probability_pd"], 0.4);
    assert_eq!(body["fusion_prediction"], 0);
    assert_eq!(body["fusion_confidence"], 0.6);
    assert_eq!(body["models_used"], json!(["spiral"]));
}

#[tokio::test]
async fn multimodal_partial_failure_still_returns_ok() {
    let registry = scripted_registry([
        ScriptedPredictor::succeeding(Modality::Voice, 0.8, 0.9),
        ScriptedPredictor::failing(Modality::Datscan, "scan unreadable"),
    ]);

    let (status, body) = post_json(
        app(registry),
        "/analyze/multimodal",
        json!({
            "voice": { "audio_data": AUDIO_B64 },
            "datscan": { "image_data": IMAGE_B64 },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fusion_probability_pd"], 0.8);
    assert_eq!(body["models_used"], json!(["voice"]));

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["modality"], "datscan");
    assert!(errors[0]["message"].as_str().unwrap().contains("scan unreadable"));
}

#[tokio::test]
async fn multimodal_all_failures_report_insufficient_data() {
    let registry = scripted_registry([
        ScriptedPredictor::failing(Modality::Voice, "mic noise"),
        ScriptedPredictor::failing(Modality::Datscan, "scan unreadable"),
        ScriptedPredictor::failing(Modality::Spiral, "bad drawing"),
    ]);

    let (status, body) = post_json(
        app(registry),
        "/analyze/multimodal",
        json!({
            "voice": { "audio_data": AUDIO_B64 },
            "datscan": { "image_data": IMAGE_B64 },
            "spiral": { "spiral_data": IMAGE_B64 },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insufficient_data"], true);
    assert_eq!(body["fusion_prediction"], 0);
    assert_eq!(body["fusion_prediction_label"], "Insufficient Data");
    assert_eq!(body["fusion_confidence"], 0.0);
    assert_eq!(body["fusion_probability_pd"], 0.5);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    assert_eq!(body["models_used"], json!([]));
}

#[tokio::test]
async fn multimodal_empty_request_is_rejected() {
    let (status, body) = post_json(app(full_panel_registry()), "/analyze/multimodal", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn multimodal_undecodable_payload_is_a_modality_failure() {
    let (status, body) = post_json(
        app(full_panel_registry()),
        "/analyze/multimodal",
        json!({
            "voice": { "audio_data": "!!!not-base64!!!" },
            "spiral": { "spiral_data": IMAGE_B64 },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["models_used"], json!(["spiral"]));
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["modality"], "voice");
}

#[tokio::test]
async fn voice_endpoint_returns_modality_result() {
    let (status, body) = post_json(
        app(full_panel_registry()),
        "/analyze/voice",
        json!({ "audio_data": AUDIO_B64 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modality"], "voice");
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["probability_pd"], 0.8);
    assert_eq!(body["confidence"], 0.9);
    assert!(body["clinical_notes"].as_str().unwrap().contains("Voice analysis"));
}

#[tokio::test]
async fn voice_endpoint_fails_hard_on_prediction_error() {
    let registry = scripted_registry([ScriptedPredictor::failing(Modality::Voice, "mic noise")]);

    let (status, body) = post_json(
        app(registry),
        "/analyze/voice",
        json!({ "audio_data": AUDIO_B64 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "analysis_failed");
    assert_eq!(body["details"]["modality"], "voice");
}

#[tokio::test]
async fn unloaded_modality_endpoint_returns_service_unavailable() {
    let registry = scripted_registry([ScriptedPredictor::succeeding(Modality::Voice, 0.8, 0.9)]);

    let (status, body) = post_json(
        app(registry),
        "/analyze/datscan",
        json!({ "image_data": IMAGE_B64 }),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "model_unavailable");
}

#[tokio::test]
async fn spiral_endpoint_rejects_bad_base64() {
    let (status, body) = post_json(
        app(full_panel_registry()),
        "/analyze/spiral",
        json!({ "spiral_data": "!!!not-base64!!!" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
}

#[tokio::test]
async fn spiral_endpoint_accepts_data_url_payload() {
    let (status, body) = post_json(
        app(full_panel_registry()),
        "/analyze/spiral",
        json!({ "spiral_data": format!("data:image/png;base64,{IMAGE_B64}") }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modality"], "spiral");
    assert_eq!(body["probability_pd"], 0.4);
}

#[tokio::test]
async fn request_id_header_is_mirrored() {
    let response = app(full_panel_registry())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze/multimodal")
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-request-id", "test-correlation-42")
                .body(Body::from(json!({}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-correlation-42"
    );
}
