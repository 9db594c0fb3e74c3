//! Named feature vectors and alignment.
//!
//! Classifiers consume positional vectors, but extractors produce named
//! values and models ship with an expected-name list. [`align`] is the one
//! place that bridges the two: order is fixed by the expected names,
//! missing names fill with 0.0, extra names are dropped, and non-finite
//! values are mapped to 0.0.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered feature name → value pairs.
///
/// Insertion order is preserved so that explainability output (top-feature
/// display) is stable across runs. Inserting an existing name replaces its
/// value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSnapshot(Vec<(String, f64)>);

impl FeatureSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a named value, replacing any existing entry with that name.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| *value)
    }

    /// Number of named values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Iterate over names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, f64)> for FeatureSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut snapshot = FeatureSnapshot::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

impl Serialize for FeatureSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FeatureSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = FeatureSnapshot;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of feature names to numeric values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut snapshot = FeatureSnapshot::new();
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    snapshot.insert(name, value);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

/// Align a named snapshot against a model's expected feature names.
///
/// The output vector has exactly `expected.len()` entries, in the order of
/// `expected`. Names absent from the snapshot fill with 0.0; snapshot
/// entries not in `expected` are dropped; NaN and infinite values map to
/// 0.0.
pub fn align<S: AsRef<str>>(snapshot: &FeatureSnapshot, expected: &[S]) -> Vec<f64> {
    expected
        .iter()
        .map(|name| {
            let value = snapshot.get(name.as_ref()).unwrap_or(0.0);
            if value.is_finite() { value } else { 0.0 }
        })
        .collect()
}
