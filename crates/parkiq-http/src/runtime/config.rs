//! HTTP runtime configuration.

use std::time::Duration;

/// HTTP runtime configuration.
#[derive(Debug, Clone)]
pub struct HttpRuntimeConfig {
    /// Request timeout in seconds, the outer bound on a whole request.
    pub request_timeout_secs: u64,
    /// Per-modality inference budget; a predictor still pending past this
    /// is treated as that modality's failure, not the request's.
    pub modality_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Enable CORS for cross-origin requests.
    pub enable_cors: bool,
    /// Enable OpenAPI documentation endpoints.
    pub enable_openapi: bool,
}

impl HttpRuntimeConfig {
    /// Per-modality inference budget as a [`Duration`].
    pub fn modality_timeout(&self) -> Duration {
        Duration::from_secs(self.modality_timeout_secs)
    }
}

impl Default for HttpRuntimeConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            modality_timeout_secs: 20,
            max_body_size: 16 * 1024 * 1024, // 16MB
            enable_cors: true,
            enable_openapi: true,
        }
    }
}
