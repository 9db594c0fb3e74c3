//! Raw per-modality inputs.

use std::path::PathBuf;

use parkiq_core::Modality;

/// One modality's raw input for a single analysis request.
///
/// Voice and DaTscan payloads arrive spooled to request-owned temporary
/// files; the caller keeps the temp-file guard alive for the duration of
/// the request and only the path travels here. Spiral drawings stay in
/// memory.
#[derive(Debug, Clone)]
pub enum ModalityInput {
    /// Path to a spooled sustained-vowel recording.
    Voice { audio_path: PathBuf },
    /// Path to a spooled DaTscan image.
    Datscan { image_path: PathBuf },
    /// Decoded spiral drawing image plus the reported drawing duration.
    Spiral {
        image: Vec<u8>,
        drawing_time: Option<f64>,
    },
}

impl ModalityInput {
    /// Which modality this input feeds.
    pub fn modality(&self) -> Modality {
        match self {
            ModalityInput::Voice { .. } => Modality::Voice,
            ModalityInput::Datscan { .. } => Modality::Datscan,
            ModalityInput::Spiral { .. } => Modality::Spiral,
        }
    }
}
