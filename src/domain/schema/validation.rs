//! Column name validation

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for column names
pub const MAX_COLUMN_NAME_LENGTH: usize = 128;

/// Printable characters only, no leading/trailing whitespace
static COLUMN_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s\p{Cc}](?:[^\p{Cc}]*[^\s\p{Cc}])?$").unwrap());

/// Schema validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaValidationError {
    /// Column name is empty
    EmptyName,
    /// Column name exceeds maximum length
    NameTooLong { length: usize, max: usize },
    /// Column name contains control characters or surrounding whitespace
    InvalidNameFormat { name: String },
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Column name cannot be empty"),
            Self::NameTooLong { length, max } => {
                write!(f, "Column name too long: {} characters (max {})", length, max)
            }
            Self::InvalidNameFormat { name } => write!(
                f,
                "Invalid column name '{}': must be printable and not padded with whitespace",
                name.escape_debug()
            ),
        }
    }
}

impl std::error::Error for SchemaValidationError {}

/// Validate a source or output column name
pub fn validate_column_name(name: &str) -> Result<(), SchemaValidationError> {
    if name.is_empty() {
        return Err(SchemaValidationError::EmptyName);
    }

    let length = name.chars().count();
    if length > MAX_COLUMN_NAME_LENGTH {
        return Err(SchemaValidationError::NameTooLong {
            length,
            max: MAX_COLUMN_NAME_LENGTH,
        });
    }

    if !COLUMN_NAME_PATTERN.is_match(name) {
        return Err(SchemaValidationError::InvalidNameFormat {
            name: name.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_column_name("Parts_Per_Hour").is_ok());
        assert!(validate_column_name("Material Viscosity (cP)").is_ok());
        assert!(validate_column_name("x").is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(
            validate_column_name(""),
            Err(SchemaValidationError::EmptyName)
        );
    }

    #[test]
    fn test_padded_or_control_names() {
        assert!(matches!(
            validate_column_name(" Shift"),
            Err(SchemaValidationError::InvalidNameFormat { .. })
        ));
        assert!(matches!(
            validate_column_name("Shift\n"),
            Err(SchemaValidationError::InvalidNameFormat { .. })
        ));
    }

    #[test]
    fn test_name_too_long() {
        let name = "a".repeat(MAX_COLUMN_NAME_LENGTH + 1);
        assert!(matches!(
            validate_column_name(&name),
            Err(SchemaValidationError::NameTooLong { .. })
        ));
    }
}
