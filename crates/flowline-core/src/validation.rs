//! Shared validation utilities for identifiers across the codebase
//!
//! This module provides consistent validation logic for the string-based
//! identifiers that appear in agent definitions: agent names, step names and
//! tool type keys.

/// Validation rules for string identifiers
#[derive(Debug, Clone, Copy)]
pub struct IdentifierRules {
    /// Maximum allowed length in characters
    pub max_length: usize,
    /// Whether to allow dots (.) in the identifier
    pub allow_dots: bool,
    /// Whether to allow inner spaces in the identifier
    pub allow_spaces: bool,
    /// Whether to trim whitespace before validation
    pub trim_whitespace: bool,
}

impl IdentifierRules {
    /// Rules for step names.
    ///
    /// Step names become context key prefixes (`<step>.output`,
    /// `<step>.<param>`), so dots are rejected: a step called `a.b` would
    /// shadow the overrides of a step called `a`.
    ///
    /// - Max length: 128 characters
    /// - Allows: alphanumeric, `_`, `-`
    pub const STEP_NAME: Self = Self {
        max_length: 128,
        allow_dots: false,
        allow_spaces: false,
        trim_whitespace: false,
    };

    /// Rules for tool and memory type keys
    ///
    /// - Max length: 64 characters
    /// - Allows: alphanumeric, `_`, `-`, `.`
    pub const TYPE_KEY: Self = Self {
        max_length: 64,
        allow_dots: true,
        allow_spaces: false,
        trim_whitespace: false,
    };

    /// Rules for agent names. Agent names are labels only, so spaces are fine.
    pub const AGENT_NAME: Self = Self {
        max_length: 128,
        allow_dots: true,
        allow_spaces: true,
        trim_whitespace: true,
    };

    /// Validate a string against these rules
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The validated string (trimmed if trim_whitespace is true)
    /// * `Err(ValidationError)` - Description of validation failure
    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let processed = if self.trim_whitespace {
            input.trim()
        } else {
            input
        };

        if processed.is_empty() {
            return Err(ValidationError::Empty);
        }

        if !self.trim_whitespace && input != input.trim() {
            return Err(ValidationError::LeadingTrailingWhitespace);
        }

        let length = processed.chars().count();
        if length > self.max_length {
            return Err(ValidationError::TooLong {
                length,
                max: self.max_length,
            });
        }

        for ch in processed.chars() {
            let is_valid = ch.is_alphanumeric()
                || ch == '_'
                || ch == '-'
                || (ch == '.' && self.allow_dots)
                || (ch == ' ' && self.allow_spaces);

            if !is_valid {
                return Err(ValidationError::InvalidChar {
                    char: ch,
                    input: processed.to_string(),
                });
            }
        }

        Ok(processed.to_string())
    }
}

/// Errors that can occur during identifier validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Identifier is empty
    #[error("Identifier cannot be empty")]
    Empty,
    /// Identifier has leading or trailing whitespace
    #[error("Identifier cannot have leading or trailing whitespace")]
    LeadingTrailingWhitespace,
    /// Identifier exceeds maximum allowed length
    #[error("Identifier too long: {length} characters (max {max})")]
    TooLong {
        /// Actual length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Identifier contains an invalid character
    #[error("Identifier '{input}' contains invalid character '{char}'")]
    InvalidChar {
        /// The invalid character
        char: char,
        /// The full input string
        input: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_name_rules() {
        let rules = IdentifierRules::STEP_NAME;

        assert!(rules.validate("firstTool").is_ok());
        assert!(rules.validate("search_index").is_ok());
        assert!(rules.validate("step-2").is_ok());

        assert!(matches!(rules.validate(""), Err(ValidationError::Empty)));
        assert!(matches!(
            rules.validate("step.one"),
            Err(ValidationError::InvalidChar { char: '.', .. })
        ));
        assert!(matches!(
            rules.validate("${parameters.x}"),
            Err(ValidationError::InvalidChar { char: '$', .. })
        ));
        assert!(matches!(
            rules.validate(" step"),
            Err(ValidationError::LeadingTrailingWhitespace)
        ));
    }

    #[test]
    fn test_type_key_rules() {
        let rules = IdentifierRules::TYPE_KEY;

        assert!(rules.validate("SearchIndexTool").is_ok());
        assert!(rules.validate("conversation.index").is_ok());
        assert!(matches!(
            rules.validate("tool type"),
            Err(ValidationError::InvalidChar { char: ' ', .. })
        ));

        let long_name = "a".repeat(65);
        assert!(matches!(
            rules.validate(&long_name),
            Err(ValidationError::TooLong { length: 65, max: 64 })
        ));
    }

    #[test]
    fn test_agent_name_trimming() {
        let rules = IdentifierRules::AGENT_NAME;

        assert_eq!(rules.validate("  Test Agent  ").unwrap(), "Test Agent");
        assert!(matches!(rules.validate("   "), Err(ValidationError::Empty)));
        assert!(matches!(
            rules.validate("agent\u{7}"),
            Err(ValidationError::InvalidChar { .. })
        ));
    }
}
