//! Error types for denormalization.

use std::fmt;
use thiserror::Error;

/// Result type for denormalization operations.
pub type DenormalizeResult<T> = Result<T, DenormalizeError>;

/// The record field a failure or lookup-miss was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldLocation {
    pub entity_type: String,
    pub id: String,
    pub field: String,
}

impl FieldLocation {
    pub fn new(entity_type: &str, id: &str, field: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            field: field.to_string(),
        }
    }
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}].{}", self.entity_type, self.id, self.field)
    }
}

/// Errors that abort a denormalization call. No partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenormalizeError {
    /// The store holds a type the schema map does not describe.
    #[error("no schema registered for entity type `{entity_type}`")]
    MissingTypeSchema { entity_type: String },

    /// A field descriptor carries no relationship schema.
    #[error("{location}: field descriptor has no schema")]
    MissingSchema { location: FieldLocation },

    /// Union relationships cannot be resolved.
    #[error("{location}: union schemas are not supported")]
    UnsupportedUnion { location: FieldLocation },

    /// A relationship targets a type with no sub-store.
    #[error("{location}: target type `{target}` is not present in the store")]
    UnknownTargetType { location: FieldLocation, target: String },

    /// An iterable field's raw value is neither an array nor an object.
    #[error("{location}: expected an array or object of ids, found {found}")]
    NotACollection {
        location: FieldLocation,
        found: &'static str,
    },

    /// A raw identifier is not a string, number or null.
    #[error("{location}: identifier must be a string, number or null, found {found}")]
    InvalidIdentifier {
        location: FieldLocation,
        found: &'static str,
    },

    /// A referenced record does not exist (strict mode only).
    #[error("{location}: no `{target}` record with id `{target_id}`")]
    DanglingReference {
        location: FieldLocation,
        target: String,
        target_id: String,
    },
}

impl DenormalizeError {
    /// Location of the offending field, if the error is field-scoped.
    pub fn location(&self) -> Option<&FieldLocation> {
        match self {
            Self::MissingTypeSchema { .. } => None,
            Self::MissingSchema { location }
            | Self::UnsupportedUnion { location }
            | Self::UnknownTargetType { location, .. }
            | Self::NotACollection { location, .. }
            | Self::InvalidIdentifier { location, .. }
            | Self::DanglingReference { location, .. } => Some(location),
        }
    }
}
