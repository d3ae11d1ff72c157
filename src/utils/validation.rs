//! Input validation primitives.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Validate a repository or organization name segment.
///
/// Hosts accept ASCII letters, digits, `.`, `_` and `-`; a slash would make
/// the qualified name ambiguous.
pub fn require_name_segment<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    let pattern =
        SEGMENT.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("segment pattern is valid"));

    let trimmed = require_non_empty(value, field, &format!("{} cannot be empty", field))?;

    if !pattern.is_match(trimmed) || trimmed == "." || trimmed == ".." {
        return Err(Error::validation_invalid_argument(
            field,
            format!(
                "{} '{}' may only contain letters, digits, '.', '_' and '-'",
                field, trimmed
            ),
            Some(trimmed.to_string()),
            None,
        ));
    }

    Ok(trimmed)
}

/// Validate a shell-style environment variable name.
pub fn require_env_name<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    static ENV_NAME: OnceLock<Regex> = OnceLock::new();
    let pattern = ENV_NAME
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("env pattern is valid"));

    let trimmed = require_non_empty(value, field, &format!("{} cannot be empty", field))?;

    if !pattern.is_match(trimmed) {
        return Err(Error::validation_invalid_argument(
            field,
            format!("{} '{}' is not a valid environment variable name", field, trimmed),
            Some(trimmed.to_string()),
            None,
        ));
    }

    Ok(trimmed)
}
