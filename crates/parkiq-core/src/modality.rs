use serde::{Deserialize, Serialize};

/// One independent source of diagnostic evidence.
///
/// The variant order is the canonical enumeration order. Wherever an
/// ordering of modalities is observable (narrative sentences,
/// recommendation lists, serialized modality sets) it follows
/// [`Modality::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    /// Sustained-vowel voice recording.
    Voice,
    /// Dopamine-transporter brain scan.
    Datscan,
    /// Spiral-drawing motor trace.
    Spiral,
}

impl Modality {
    /// Get the modality name as used on the wire and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Modality::Voice => "voice",
            Modality::Datscan => "datscan",
            Modality::Spiral => "spiral",
        }
    }

    /// Try to parse a wire name into a modality.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "voice" => Some(Modality::Voice),
            "datscan" => Some(Modality::Datscan),
            "spiral" => Some(Modality::Spiral),
            _ => None,
        }
    }

    /// All known modalities, in canonical order.
    pub fn all() -> &'static [Modality] {
        &[Modality::Voice, Modality::Datscan, Modality::Spiral]
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
