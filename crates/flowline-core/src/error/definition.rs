//! Agent definition parsing and validation errors.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while loading or validating an agent definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The serialized definition could not be parsed.
    #[error("Failed to parse {format} agent definition: {reason}")]
    Parse {
        /// Source format (`json` or `toml`)
        format: &'static str,
        /// Parser message
        reason: String,
    },

    /// A name or type key failed identifier validation.
    #[error("Invalid {field} '{value}': {source}")]
    InvalidName {
        /// Which field was invalid (`agent`, `step`, `tool type`, `memory type`)
        field: &'static str,
        /// The rejected value
        value: String,
        /// Validation failure
        #[source]
        source: ValidationError,
    },
}

impl DefinitionError {
    /// Create an InvalidName error.
    pub fn invalid_name(
        field: &'static str,
        value: impl Into<String>,
        source: ValidationError,
    ) -> Self {
        DefinitionError::InvalidName {
            field,
            value: value.into(),
            source,
        }
    }
}

/// Result type alias for definition operations.
pub type DefinitionResult<T> = Result<T, DefinitionError>;
