//! Per-modality feature extraction.
//!
//! Real signal processing is out of scope for this system: each extractor
//! is an opaque producer of a named feature vector. To keep analyses
//! reproducible and auditable, the values are derived deterministically
//! from a SHA-256 digest of the raw input: the same recording, drawing,
//! or scan always yields the same features.

use std::fs;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use parkiq_core::{FeatureSnapshot, Modality};

use crate::error::{ModelError, ModelResult};
use crate::input::ModalityInput;

/// Converts one modality's raw input into a named feature vector.
pub trait FeatureExtractor: Send + Sync {
    /// Which modality this extractor serves.
    fn modality(&self) -> Modality;

    /// The feature names this extractor emits, in a fixed order.
    fn feature_names(&self) -> &'static [&'static str];

    /// Extract features from a raw input.
    ///
    /// Fails with [`ModelError::UnsupportedInput`] if handed another
    /// modality's input and [`ModelError::Extraction`] on unreadable or
    /// empty payloads.
    fn extract(&self, input: &ModalityInput) -> ModelResult<FeatureSnapshot>;
}

/// Seed a generator from the raw input so extraction is reproducible.
fn digest_seed(bytes: &[u8]) -> u64 {
    let digest = Sha256::digest(bytes);
    u64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}

fn read_payload(modality: Modality, path: &std::path::Path) -> ModelResult<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| ModelError::Extraction {
        modality,
        reason: format!("failed to read {}: {e}", path.display()),
    })?;
    if bytes.is_empty() {
        return Err(ModelError::Extraction {
            modality,
            reason: "empty payload".into(),
        });
    }
    Ok(bytes)
}

/// Feature names of the sustained-vowel acoustic profile.
pub const VOICE_FEATURE_NAMES: &[&str] = &[
    "duration",
    "pitch_mean",
    "pitch_std",
    "pitch_min",
    "pitch_max",
    "jitter_percent",
    "jitter_abs",
    "shimmer_percent",
    "shimmer_abs",
    "spectral_centroid_mean",
    "spectral_centroid_std",
    "spectral_rolloff_mean",
    "spectral_rolloff_std",
    "mfcc_1",
    "mfcc_2",
    "mfcc_3",
    "mfcc_4",
    "mfcc_5",
    "mfcc_6",
    "mfcc_7",
    "mfcc_8",
    "mfcc_9",
    "mfcc_10",
    "mfcc_11",
    "mfcc_12",
    "mfcc_13",
    "zero_crossing_rate_mean",
    "zero_crossing_rate_std",
    "hnr",
    "formant_f1_mean",
    "formant_f1_std",
    "formant_f2_mean",
    "formant_f2_std",
];

/// Feature names of the spiral-drawing motor profile.
pub const SPIRAL_FEATURE_NAMES: &[&str] = &[
    "tremor_amplitude",
    "tremor_frequency",
    "drawing_speed",
    "spiral_tightness",
    "line_smoothness",
    "pressure_variation",
    "drawing_time",
    "pen_lift_count",
    "spiral_deviation",
    "stroke_length_mean",
    "stroke_length_std",
    "angular_velocity",
    "curvature_variation",
    "spiral_radius_mean",
    "spiral_radius_std",
    "drawing_consistency",
    "motor_control_score",
    "tremor_severity",
    "coordination_index",
    "fluidity_measure",
];

/// Feature names summarizing the DaTscan embedding.
pub const DATSCAN_FEATURE_NAMES: &[&str] = &[
    "dopamine_activity",
    "striatal_asymmetry",
    "background_ratio",
    "embedding_mean",
    "embedding_std",
];

/// Extracts the acoustic profile of a sustained-vowel recording.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceFeatureExtractor;

impl FeatureExtractor for VoiceFeatureExtractor {
    fn modality(&self) -> Modality {
        Modality::Voice
    }

    fn feature_names(&self) -> &'static [&'static str] {
        VOICE_FEATURE_NAMES
    }

    fn extract(&self, input: &ModalityInput) -> ModelResult<FeatureSnapshot> {
        let ModalityInput::Voice { audio_path } = input else {
            return Err(ModelError::UnsupportedInput {
                modality: Modality::Voice,
                reason: format!("expected a voice recording, got {} input", input.modality()),
            });
        };

        let bytes = read_payload(Modality::Voice, audio_path)?;
        let mut rng = StdRng::seed_from_u64(digest_seed(&bytes));
        let mut features = FeatureSnapshot::new();

        features.insert("duration", rng.random_range(1.5..8.0));

        let pitch_mean: f64 = rng.random_range(90.0..240.0);
        let pitch_std: f64 = rng.random_range(4.0..55.0);
        features.insert("pitch_mean", pitch_mean);
        features.insert("pitch_std", pitch_std);
        features.insert("pitch_min", (pitch_mean - 2.0 * pitch_std).max(50.0));
        features.insert("pitch_max", pitch_mean + 2.0 * pitch_std);

        features.insert("jitter_percent", rng.random_range(0.2..3.5));
        features.insert("jitter_abs", rng.random_range(0.01..0.4));
        features.insert("shimmer_percent", rng.random_range(1.0..12.0));
        features.insert("shimmer_abs", rng.random_range(0.05..1.2));

        features.insert("spectral_centroid_mean", rng.random_range(900.0..3200.0));
        features.insert("spectral_centroid_std", rng.random_range(80.0..600.0));
        features.insert("spectral_rolloff_mean", rng.random_range(1800.0..6400.0));
        features.insert("spectral_rolloff_std", rng.random_range(150.0..900.0));

        for i in 1..=13 {
            features.insert(format!("mfcc_{i}"), rng.random_range(-40.0..40.0));
        }

        features.insert("zero_crossing_rate_mean", rng.random_range(0.02..0.2));
        features.insert("zero_crossing_rate_std", rng.random_range(0.005..0.06));
        features.insert("hnr", rng.random_range(5.0..28.0));

        features.insert("formant_f1_mean", rng.random_range(300.0..900.0));
        features.insert("formant_f1_std", rng.random_range(20.0..150.0));
        features.insert("formant_f2_mean", rng.random_range(900.0..2600.0));
        features.insert("formant_f2_std", rng.random_range(50.0..400.0));

        Ok(features)
    }
}

/// Extracts the motor-control profile of a spiral drawing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiralFeatureExtractor;

impl FeatureExtractor for SpiralFeatureExtractor {
    fn modality(&self) -> Modality {
        Modality::Spiral
    }

    fn feature_names(&self) -> &'static [&'static str] {
        SPIRAL_FEATURE_NAMES
    }

    fn extract(&self, input: &ModalityInput) -> ModelResult<FeatureSnapshot> {
        let ModalityInput::Spiral {
            image,
            drawing_time,
        } = input
        else {
            return Err(ModelError::UnsupportedInput {
                modality: Modality::Spiral,
                reason: format!("expected a spiral drawing, got {} input", input.modality()),
            });
        };

        if image.is_empty() {
            return Err(ModelError::Extraction {
                modality: Modality::Spiral,
                reason: "empty drawing payload".into(),
            });
        }

        let mut rng = StdRng::seed_from_u64(digest_seed(image));
        let mut features = FeatureSnapshot::new();

        features.insert("tremor_amplitude", rng.random_range(0.1..0.9));
        features.insert("tremor_frequency", rng.random_range(0.2..0.8));
        features.insert("drawing_speed", rng.random_range(0.3..0.9));
        features.insert("spiral_tightness", rng.random_range(0.4..0.95));
        features.insert("line_smoothness", rng.random_range(0.2..0.9));
        features.insert("pressure_variation", rng.random_range(0.1..0.8));

        features.insert(
            "drawing_time",
            drawing_time.unwrap_or_else(|| rng.random_range(10.0..60.0)),
        );
        features.insert("pen_lift_count", rng.random_range(0..10) as f64);
        features.insert("spiral_deviation", rng.random_range(0.1..0.8));

        features.insert("stroke_length_mean", rng.random_range(5.0..25.0));
        features.insert("stroke_length_std", rng.random_range(1.0..8.0));
        features.insert("angular_velocity", rng.random_range(0.5..2.5));

        features.insert("curvature_variation", rng.random_range(0.2..0.9));
        features.insert("spiral_radius_mean", rng.random_range(50.0..150.0));
        features.insert("spiral_radius_std", rng.random_range(5.0..25.0));

        features.insert("drawing_consistency", rng.random_range(0.3..0.9));
        features.insert("motor_control_score", rng.random_range(0.4..0.95));
        features.insert("tremor_severity", rng.random_range(0.1..0.8));
        features.insert("coordination_index", rng.random_range(0.2..0.9));
        features.insert("fluidity_measure", rng.random_range(0.3..0.9));

        Ok(features)
    }
}

/// Summarizes a DaTscan image into embedding statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatscanFeatureExtractor;

impl DatscanFeatureExtractor {
    /// Dimensionality of the internal image embedding.
    const EMBEDDING_DIM: usize = 512;
}

impl FeatureExtractor for DatscanFeatureExtractor {
    fn modality(&self) -> Modality {
        Modality::Datscan
    }

    fn feature_names(&self) -> &'static [&'static str] {
        DATSCAN_FEATURE_NAMES
    }

    fn extract(&self, input: &ModalityInput) -> ModelResult<FeatureSnapshot> {
        let ModalityInput::Datscan { image_path } = input else {
            return Err(ModelError::UnsupportedInput {
                modality: Modality::Datscan,
                reason: format!("expected a DaTscan image, got {} input", input.modality()),
            });
        };

        let bytes = read_payload(Modality::Datscan, image_path)?;
        let mut rng = StdRng::seed_from_u64(digest_seed(&bytes));

        let embedding: Vec<f64> = (0..Self::EMBEDDING_DIM)
            .map(|_| rng.random_range(0.0..1.0))
            .collect();
        let mean = embedding.iter().sum::<f64>() / embedding.len() as f64;
        let variance = embedding
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / embedding.len() as f64;
        let std = variance.sqrt();

        let mut features = FeatureSnapshot::new();
        features.insert("dopamine_activity", rng.random_range(0.2..0.95));
        features.insert("striatal_asymmetry", rng.random_range(0.0..0.5));
        features.insert("background_ratio", rng.random_range(0.5..2.5));
        features.insert("embedding_mean", mean);
        features.insert("embedding_std", std);

        Ok(features)
    }
}
