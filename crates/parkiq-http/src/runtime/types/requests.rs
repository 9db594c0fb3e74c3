//! Request bodies for the analysis endpoints.

use serde::Deserialize;
use utoipa::ToSchema;

/// A sustained-vowel recording for voice analysis.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VoiceAnalysisRequest {
    /// Base64-encoded audio (optionally a `data:` URL).
    pub audio_data: String,
}

/// A DaTscan image for imaging analysis.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DatscanAnalysisRequest {
    /// Base64-encoded scan image (optionally a `data:` URL).
    pub image_data: String,
}

/// A spiral drawing for motor analysis.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SpiralAnalysisRequest {
    /// Base64-encoded drawing image (optionally a `data:` URL).
    pub spiral_data: String,
    /// How long the drawing took, in seconds.
    #[serde(default)]
    pub drawing_time: Option<f64>,
}

/// Any non-empty subset of the three modality payloads.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MultimodalAnalysisRequest {
    #[serde(default)]
    pub voice: Option<VoiceAnalysisRequest>,
    #[serde(default)]
    pub datscan: Option<DatscanAnalysisRequest>,
    #[serde(default)]
    pub spiral: Option<SpiralAnalysisRequest>,
}

impl MultimodalAnalysisRequest {
    /// Whether no modality payload was provided at all.
    pub fn is_empty(&self) -> bool {
        self.voice.is_none() && self.datscan.is_none() && self.spiral.is_none()
    }
}
