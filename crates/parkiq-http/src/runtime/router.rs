//! HTTP router configuration.

use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::runtime::{
    HttpRuntimeConfig,
    error::request_id_middleware,
    handlers::{
        analyze_datscan, analyze_multimodal, analyze_spiral, analyze_voice, features_info,
        health_check, model_info,
    },
    service::AnalysisRuntime,
};

impl AnalysisRuntime {
    /// Create the Axum router with all endpoints and middleware.
    pub fn router(self) -> Router {
        let config = self.config.clone();
        self.router_with_config(&config)
    }

    /// Create the Axum router with explicit configuration.
    pub fn router_with_config(self, config: &HttpRuntimeConfig) -> Router {
        let analysis_routes = Router::new()
            .route("/analyze/voice", post(analyze_voice))
            .route("/analyze/datscan", post(analyze_datscan))
            .route("/analyze/spiral", post(analyze_spiral))
            .route("/analyze/multimodal", post(analyze_multimodal));

        let status_routes = Router::new()
            .route("/health", get(health_check))
            .route("/model-info", get(model_info))
            .route("/features", get(features_info));

        let mut router = Router::new()
            .merge(analysis_routes)
            .merge(status_routes)
            .with_state(self)
            .layer(middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(axum::extract::DefaultBodyLimit::max(config.max_body_size));

        if config.enable_cors {
            router = router.layer(CorsLayer::permissive());
        }

        #[cfg(feature = "openapi")]
        if config.enable_openapi {
            router = router.merge(crate::runtime::docs::router());
        }

        router
    }
}
