use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalize a submitted name into its uniqueness key.
///
/// Surrounding whitespace is dropped and the remainder is lowercased, so
/// `" Rose "`, `"rose"` and `"ROSE"` all map to the same reservation.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A reserved flower name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowerName {
    /// Display form, as submitted (trimmed).
    pub name: String,
    /// Lowercased form used for uniqueness.
    pub normalized_key: String,
    /// When the name was reserved (server clock).
    pub created_at: DateTime<Utc>,
}

impl FlowerName {
    /// Build a record for `name` stamped with the current time.
    pub fn new(name: &str) -> Self {
        Self::with_timestamp(name, Utc::now())
    }

    pub fn with_timestamp(name: &str, created_at: DateTime<Utc>) -> Self {
        let name = name.trim();
        Self {
            name: name.to_string(),
            normalized_key: normalize_key(name),
            created_at,
        }
    }
}

/// Sort records newest first. The sort is stable, so equal timestamps keep
/// whatever order the backend produced.
pub fn sort_newest_first(names: &mut [FlowerName]) {
    names.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
