//! Unified error handling for the HTTP runtime.
//!
//! Errors map to structured JSON responses with a typed error code, an HTTP
//! status, and the request ID that produced them. Partial modality failures
//! during multimodal analysis never travel this path; they are response
//! data, not errors.

use axum::{
    extract::Request,
    http::{
        StatusCode,
        header::{self, HeaderValue},
    },
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use parkiq_core::Modality;
use parkiq_models::ModelError;

/// Unique identifier correlating one request's logs and error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an already-validated identifier.
    pub fn new_unchecked(id: String) -> Self {
        Self(id)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extension storing the [`RequestId`] in Axum request extensions.
#[derive(Debug, Clone)]
pub struct RequestIdExtension(pub RequestId);

const MAX_REQUEST_ID_LENGTH: usize = 128;

/// Client-provided request IDs must be short, alphanumeric-with-dashes
/// strings; anything else is replaced rather than echoed into logs.
fn validate_request_id(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_REQUEST_ID_LENGTH
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Middleware that extracts or generates the `X-Request-ID` for a request
/// and mirrors it onto the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| validate_request_id(s))
        .map(|s| RequestId::new_unchecked(s.to_string()))
        .unwrap_or_else(RequestId::generate);

    request
        .extensions_mut()
        .insert(RequestIdExtension(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(
            header::HeaderName::from_static("x-request-id"),
            header_value,
        );
    }

    response
}

/// Type-safe error codes for runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed request (no payloads, bad encoding, invariant violation).
    ValidationFailed,
    /// Payload shape does not match the addressed modality.
    UnsupportedPayload,
    /// The addressed modality's model is not loaded.
    ModelUnavailable,
    /// The modality's extraction or prediction failed.
    AnalysisFailed,
    /// Request body was not valid JSON.
    InvalidJson,
    /// A modality inference exceeded its budget.
    Timeout,
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// The snake_case wire representation of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::UnsupportedPayload => "unsupported_payload",
            Self::ModelUnavailable => "model_unavailable",
            Self::AnalysisFailed => "analysis_failed",
            Self::InvalidJson => "invalid_json",
            Self::Timeout => "timeout",
            Self::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Request ID for correlation.
    pub request_id: RequestId,
    /// When the error occurred.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Specific error information for each error category.
#[derive(Debug, Clone)]
pub enum RuntimeErrorKind {
    /// Malformed request.
    Validation { reason: String },
    /// Payload shape does not match the addressed modality.
    UnsupportedPayload { modality: Modality, reason: String },
    /// The addressed modality's model is not loaded.
    ModelUnavailable { modality: Modality },
    /// The modality's extraction or prediction failed.
    AnalysisFailed { modality: Modality, reason: String },
    /// Request body was not valid JSON.
    InvalidJson { reason: String },
    /// A modality inference exceeded its budget.
    Timeout { modality: Modality, seconds: f64 },
    /// Internal server error.
    Internal { reason: String },
}

/// Runtime error carrying the request ID it belongs to.
#[derive(Debug)]
pub struct RuntimeError {
    /// Request ID for tracking and correlation.
    pub request_id: RequestId,
    /// Specific error information.
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    /// Create a runtime error with the given kind and request ID.
    pub fn new(kind: RuntimeErrorKind, request_id: RequestId) -> Self {
        Self { request_id, kind }
    }

    /// Create a Validation error.
    pub fn validation(reason: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(
            RuntimeErrorKind::Validation {
                reason: reason.into(),
            },
            request_id,
        )
    }

    /// Create an InvalidJson error.
    pub fn invalid_json(reason: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(
            RuntimeErrorKind::InvalidJson {
                reason: reason.into(),
            },
            request_id,
        )
    }

    /// Create an Internal error.
    pub fn internal(reason: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(
            RuntimeErrorKind::Internal {
                reason: reason.into(),
            },
            request_id,
        )
    }

    /// Map a model-layer error onto the single-modality failure contract.
    pub fn from_model_error(err: ModelError, request_id: RequestId) -> Self {
        let kind = match err {
            ModelError::NotLoaded { modality } => RuntimeErrorKind::ModelUnavailable { modality },
            ModelError::UnsupportedInput { modality, reason } => {
                RuntimeErrorKind::UnsupportedPayload { modality, reason }
            }
            ModelError::Timeout { modality, seconds } => {
                RuntimeErrorKind::Timeout { modality, seconds }
            }
            ModelError::Extraction { modality, reason }
            | ModelError::Prediction { modality, reason } => {
                RuntimeErrorKind::AnalysisFailed { modality, reason }
            }
            ModelError::Load { reason, .. } => RuntimeErrorKind::Internal { reason },
        };
        Self::new(kind, request_id)
    }

    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match &self.kind {
            RuntimeErrorKind::Validation { .. } => StatusCode::BAD_REQUEST,
            RuntimeErrorKind::UnsupportedPayload { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RuntimeErrorKind::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RuntimeErrorKind::AnalysisFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RuntimeErrorKind::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            RuntimeErrorKind::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            RuntimeErrorKind::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The typed error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match &self.kind {
            RuntimeErrorKind::Validation { .. } => ErrorCode::ValidationFailed,
            RuntimeErrorKind::UnsupportedPayload { .. } => ErrorCode::UnsupportedPayload,
            RuntimeErrorKind::ModelUnavailable { .. } => ErrorCode::ModelUnavailable,
            RuntimeErrorKind::AnalysisFailed { .. } => ErrorCode::AnalysisFailed,
            RuntimeErrorKind::InvalidJson { .. } => ErrorCode::InvalidJson,
            RuntimeErrorKind::Timeout { .. } => ErrorCode::Timeout,
            RuntimeErrorKind::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Convert this error into a structured response body.
    ///
    /// Internal reasons are logged server-side with the request ID; only
    /// the modality and a caller-actionable message reach the client.
    pub fn to_error_response(&self) -> ErrorResponse {
        let mut response = ErrorResponse {
            error: self.error_code().as_str().to_string(),
            message: self.user_facing_message(),
            details: None,
            request_id: self.request_id.clone(),
            timestamp: chrono::Utc::now(),
        };

        match &self.kind {
            RuntimeErrorKind::UnsupportedPayload { modality, .. }
            | RuntimeErrorKind::ModelUnavailable { modality }
            | RuntimeErrorKind::AnalysisFailed { modality, .. }
            | RuntimeErrorKind::Timeout { modality, .. } => {
                response.details = Some(serde_json::json!({ "modality": modality.name() }));
            }
            _ => {}
        }

        response
    }

    fn user_facing_message(&self) -> String {
        match &self.kind {
            RuntimeErrorKind::Validation { reason } => format!("Invalid request: {reason}."),
            RuntimeErrorKind::UnsupportedPayload { modality, .. } => {
                format!("The provided payload is not a usable {modality} input.")
            }
            RuntimeErrorKind::ModelUnavailable { modality } => {
                format!("The {modality} model is not available.")
            }
            RuntimeErrorKind::AnalysisFailed { modality, .. } => {
                format!("Analysis of the {modality} input could not be completed.")
            }
            RuntimeErrorKind::InvalidJson { .. } => "Invalid JSON in request body.".to_string(),
            RuntimeErrorKind::Timeout { modality, .. } => {
                format!("The {modality} analysis timed out. Please try again.")
            }
            RuntimeErrorKind::Internal { .. } => {
                "An internal error occurred. Please try again later.".to_string()
            }
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            RuntimeErrorKind::Validation { reason } => write!(f, "validation failed: {reason}"),
            RuntimeErrorKind::UnsupportedPayload { modality, reason } => {
                write!(f, "unsupported {modality} payload: {reason}")
            }
            RuntimeErrorKind::ModelUnavailable { modality } => {
                write!(f, "{modality} model unavailable")
            }
            RuntimeErrorKind::AnalysisFailed { modality, reason } => {
                write!(f, "{modality} analysis failed: {reason}")
            }
            RuntimeErrorKind::InvalidJson { reason } => write!(f, "invalid JSON: {reason}"),
            RuntimeErrorKind::Timeout { modality, seconds } => {
                write!(f, "{modality} analysis timed out after {seconds:.1}s")
            }
            RuntimeErrorKind::Internal { reason } => write!(f, "internal error: {reason}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl IntoResponse for RuntimeError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = self.to_error_response();

        tracing::error!(
            error_code = %self.error_code(),
            request_id = %self.request_id,
            status_code = %status_code,
            error_message = %self,
            "HTTP runtime error occurred"
        );

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for HTTP runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }

    #[test]
    fn status_code_mapping() {
        let request_id = RequestId::generate();

        let error = RuntimeError::validation("no payloads", request_id.clone());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);

        let error = RuntimeError::from_model_error(
            ModelError::NotLoaded {
                modality: Modality::Datscan,
            },
            request_id.clone(),
        );
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.error_code(), ErrorCode::ModelUnavailable);

        let error = RuntimeError::from_model_error(
            ModelError::Extraction {
                modality: Modality::Voice,
                reason: "empty payload".into(),
            },
            request_id,
        );
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn error_response_names_the_modality_without_internal_detail() {
        let request_id = RequestId::generate();
        let error = RuntimeError::from_model_error(
            ModelError::Prediction {
                modality: Modality::Spiral,
                reason: "matrix shape mismatch at layer 3".into(),
            },
            request_id.clone(),
        );

        let response = error.to_error_response();
        assert_eq!(response.error, "analysis_failed");
        assert_eq!(response.request_id, request_id);
        assert_eq!(response.details.unwrap()["modality"], "spiral");
        assert!(!response.message.contains("matrix shape"));
    }

    #[test]
    fn client_request_id_validation() {
        assert!(validate_request_id("abc-123_DEF"));
        assert!(!validate_request_id(""));
        assert!(!validate_request_id("has space"));
        assert!(!validate_request_id("colon:injection"));
        assert!(!validate_request_id(&"x".repeat(200)));
    }
}
