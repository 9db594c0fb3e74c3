//! # ParkIQ Core
//!
//! Domain types and the late-fusion decision layer for the ParkIQ
//! multimodal Parkinson's screening system. This crate is pure and
//! deterministic: it performs no I/O and holds no mutable state, which is
//! what makes the fusion verdicts reproducible and auditable.

pub mod error;
pub mod features;
pub mod fusion;
pub mod modality;
pub mod narrator;
pub mod result;

pub use error::{ValidationError, ValidationResult};
pub use features::{FeatureSnapshot, align};
pub use fusion::{FusionConfig, FusionEngine, FusionVerdict, PROBABILITY_TOLERANCE};
pub use modality::Modality;
pub use narrator::{ClinicalNarrative, ClinicalNarrator};
pub use result::{ModalityResult, Prediction};
