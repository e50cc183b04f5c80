use rehydrate_model::PRIVATE_FIELD_MARKER;
use serde::{Deserialize, Serialize};

/// What to do when an identifier has no matching record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReferencePolicy {
    /// Store a [`Link::Dangling`](crate::Link::Dangling) and keep going.
    #[default]
    Mark,
    /// Abort with [`DenormalizeError::DanglingReference`](crate::DenormalizeError::DanglingReference).
    Reject,
}

/// Tunables for a [`Denormalizer`](crate::Denormalizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenormalizeOptions {
    pub missing_references: MissingReferencePolicy,
    /// Schema fields whose names start with this character are skipped.
    pub private_marker: char,
}

impl Default for DenormalizeOptions {
    fn default() -> Self {
        Self {
            missing_references: MissingReferencePolicy::Mark,
            private_marker: PRIVATE_FIELD_MARKER,
        }
    }
}

impl DenormalizeOptions {
    /// Options that reject dangling references.
    pub fn strict() -> Self {
        Self::default().with_missing_references(MissingReferencePolicy::Reject)
    }

    #[must_use]
    pub fn with_missing_references(mut self, policy: MissingReferencePolicy) -> Self {
        self.missing_references = policy;
        self
    }

    #[must_use]
    pub fn with_private_marker(mut self, marker: char) -> Self {
        self.private_marker = marker;
        self
    }
}
