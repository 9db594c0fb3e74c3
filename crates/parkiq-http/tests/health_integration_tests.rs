//! Integration tests for the health and model-information endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use parkiq_http::AnalysisRuntime;
use parkiq_models::ModelRegistry;

fn create_test_app() -> axum::Router {
    let registry = ModelRegistry::load().expect("shipped models load");
    AnalysisRuntime::new(registry).router()
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_endpoint_returns_ok_with_model_readiness() {
    let (status, json) = get_json(create_test_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "parkiq-http-runtime");
    assert!(json["version"].is_string());
    assert!(json["uptime_seconds"].is_number());
    assert!(json["timestamp"].is_string());

    assert_eq!(json["models"]["voice"], true);
    assert_eq!(json["models"]["datscan"], true);
    assert_eq!(json["models"]["spiral"], true);
}

#[tokio::test]
async fn model_info_reports_loaded_models_and_weights() {
    let (status, json) = get_json(create_test_app(), "/model-info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["models"]["voice"]["model_type"], "XGBoost Classifier");
    assert_eq!(json["models"]["voice"]["accuracy"], 86.61);

    let sample = json["models"]["voice"]["sample_features"].as_array().unwrap();
    assert!(!sample.is_empty());
    assert!(sample.len() <= 10);

    assert_eq!(
        json["loaded_modalities"],
        serde_json::json!(["voice", "datscan", "spiral"])
    );
    assert_eq!(json["fusion_weights"]["datscan"], 0.5);
    assert_eq!(json["fusion_weights"]["voice"], 0.2);
}

#[tokio::test]
async fn features_endpoint_describes_the_voice_catalog() {
    let (status, json) = get_json(create_test_app(), "/features").await;

    assert_eq!(status, StatusCode::OK);
    let mfcc = json["feature_categories"]["mfcc_features"].as_array().unwrap();
    assert_eq!(mfcc.len(), 13);
    assert!(
        json["clinical_relevance"]["jitter"]
            .as_str()
            .unwrap()
            .contains("vocal cord")
    );
}

#[tokio::test]
async fn shipped_models_analyze_end_to_end() {
    // Same payload twice: deterministic extraction and prediction must
    // produce identical probabilities.
    let payload = serde_json::json!({
        "spiral": { "spiral_data": "ZmFrZS1wbmctYnl0ZXM=", "drawing_time": 30.0 },
    });

    let mut probabilities = Vec::new();
    for _ in 0..2 {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/analyze/multimodal")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["insufficient_data"], false);
        probabilities.push(json["fusion_probability_pd"].as_f64().unwrap());
    }

    assert_eq!(probabilities[0], probabilities[1]);
    assert!((0.0..=1.0).contains(&probabilities[0]));
}
