//! HTTP request handlers.

pub mod analyze;
pub mod health;

pub use analyze::{analyze_datscan, analyze_multimodal, analyze_spiral, analyze_voice};
pub use health::{features_info, health_check, model_info};
