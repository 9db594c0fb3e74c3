//! Request and response types for the HTTP runtime.

pub mod requests;
pub mod responses;

pub use requests::{
    DatscanAnalysisRequest, MultimodalAnalysisRequest, SpiralAnalysisRequest, VoiceAnalysisRequest,
};
pub use responses::{
    FeatureValue, ModalityAnalysisResponse, ModalityErrorEntry, MultimodalAnalysisResponse,
};
