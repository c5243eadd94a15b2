//! Constraint vocabulary for documented fields.
//!
//! Validation markers declared on a field are resolved into formatted
//! constraint strings such as `MIN_LENGTH:3` or `REGEX:^[a-z]+$`, which the
//! metadata view lists verbatim. Enum leaves additionally carry an
//! `ALLOWED_VALUES:[..]` constraint naming every constant.

use std::collections::BTreeSet;

/// Constraint marking a value that must not be null
pub const NOT_NULL: &str = "NOT_NULL";
/// Constraint marking a string that must not be blank
pub const NOT_BLANK: &str = "NOT_BLANK";
/// Constraint marking a collection or string that must not be empty
pub const NOT_EMPTY: &str = "NOT_EMPTY";

/// Formats a minimum-length constraint
pub fn min_length(min: u64) -> String {
    format!("MIN_LENGTH:{}", min)
}

/// Formats a maximum-length constraint
pub fn max_length(max: u64) -> String {
    format!("MAX_LENGTH:{}", max)
}

/// Formats a minimum numeric value constraint
pub fn min_value(min: i64) -> String {
    format!("MIN_VALUE:{}", min)
}

/// Formats a maximum numeric value constraint
pub fn max_value(max: i64) -> String {
    format!("MAX_VALUE:{}", max)
}

/// Formats a regex pattern constraint
pub fn regex(pattern: &str) -> String {
    format!("REGEX:{}", pattern)
}

/// Formats the allowed-values constraint for an enum leaf
pub fn allowed_values(names: &[String]) -> String {
    format!("ALLOWED_VALUES:[{}]", names.join(", "))
}

/// A validation marker declared on a field.
///
/// Markers are the opaque metadata facts supplied by the host environment;
/// the constraint strings above are their rendered form.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationMarker {
    /// Value must be present
    NotNull,
    /// String must contain at least one non-whitespace character
    NotBlank,
    /// String or collection must not be empty
    NotEmpty,
    /// String or collection length bounds
    Length { min: Option<u64>, max: Option<u64> },
    /// Numeric value bounds
    Range { min: Option<i64>, max: Option<i64> },
    /// Regex the value must match
    Pattern(String),
}

/// Resolves validation markers into formatted constraint strings.
pub fn resolve(markers: &[ValidationMarker]) -> BTreeSet<String> {
    let mut result = BTreeSet::new();

    for marker in markers {
        match marker {
            ValidationMarker::NotNull => {
                result.insert(NOT_NULL.to_string());
            }
            ValidationMarker::NotBlank => {
                result.insert(NOT_BLANK.to_string());
            }
            ValidationMarker::NotEmpty => {
                result.insert(NOT_EMPTY.to_string());
            }
            ValidationMarker::Length { min, max } => {
                if let Some(min) = min {
                    result.insert(min_length(*min));
                }
                if let Some(max) = max {
                    result.insert(max_length(*max));
                }
            }
            ValidationMarker::Range { min, max } => {
                if let Some(min) = min {
                    result.insert(min_value(*min));
                }
                if let Some(max) = max {
                    result.insert(max_value(*max));
                }
            }
            ValidationMarker::Pattern(pattern) => {
                result.insert(regex(pattern));
            }
        }
    }

    result
}

/// Whether the markers imply the value must be present.
pub fn is_required(markers: &[ValidationMarker]) -> bool {
    markers.iter().any(|m| {
        matches!(
            m,
            ValidationMarker::NotNull | ValidationMarker::NotBlank | ValidationMarker::NotEmpty
        )
    })
}
