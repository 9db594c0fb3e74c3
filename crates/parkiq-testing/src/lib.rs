//! # ParkIQ Testing
//!
//! Predictor doubles that return scripted outcomes, allowing orchestrator
//! and HTTP tests to exercise the partial-failure matrix without touching
//! the real model layer.

mod scripted;

pub use scripted::{ScriptedPredictor, StaticExtractor, sample_result, scripted_registry};
