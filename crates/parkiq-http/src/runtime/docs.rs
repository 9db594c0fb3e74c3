//! OpenAPI documentation endpoints.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::runtime::handlers;
use crate::runtime::types::{
    DatscanAnalysisRequest, FeatureValue, ModalityAnalysisResponse, ModalityErrorEntry,
    MultimodalAnalysisRequest, MultimodalAnalysisResponse, SpiralAnalysisRequest,
    VoiceAnalysisRequest,
};

/// The service's OpenAPI description.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ParkIQ Analysis API",
        description = "Multimodal Parkinson's screening: per-modality analysis and late fusion"
    ),
    paths(
        handlers::analyze::analyze_voice,
        handlers::analyze::analyze_datscan,
        handlers::analyze::analyze_spiral,
        handlers::analyze::analyze_multimodal,
        handlers::health::health_check,
        handlers::health::model_info,
        handlers::health::features_info,
    ),
    components(schemas(
        VoiceAnalysisRequest,
        DatscanAnalysisRequest,
        SpiralAnalysisRequest,
        MultimodalAnalysisRequest,
        ModalityAnalysisResponse,
        MultimodalAnalysisResponse,
        ModalityErrorEntry,
        FeatureValue,
    ))
)]
pub struct ApiDoc;

/// Router serving the Swagger UI and the raw OpenAPI document.
pub fn router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
