//! # ParkIQ Models
//!
//! The modality capability layer: feature extraction and prediction behind
//! trait seams, plus the immutable-after-load [`ModelRegistry`] that the
//! orchestrator is handed at startup.
//!
//! The shipped predictors are deterministic mocks standing in for trained
//! classifiers. They live in the clearly-tagged [`mock`] module and satisfy
//! the same [`ModalityPredictor`] contract as a real model would, so
//! production wiring and tests swap implementations through one interface.

pub mod error;
pub mod extractor;
pub mod input;
pub mod mock;
pub mod predictor;
pub mod registry;

pub use error::{ModelError, ModelResult};
pub use extractor::{
    DatscanFeatureExtractor, FeatureExtractor, SpiralFeatureExtractor, VoiceFeatureExtractor,
};
pub use input::ModalityInput;
pub use mock::{MockDatscanModel, MockSpiralModel, MockVoiceModel};
pub use predictor::ModalityPredictor;
pub use registry::{ModalityModel, ModelInfo, ModelRegistry, ModelRegistryBuilder};
