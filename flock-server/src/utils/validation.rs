//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so handlers apply
//! these before anything reaches a repository.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person names: member full name, confessor name, display name
pub const MAX_NAME_LEN: usize = 200;

/// Meeting / notification titles
pub const MAX_TITLE_LEN: usize = 200;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 32;

/// Notes, descriptions, notification messages
pub const MAX_NOTE_LEN: usize = 500;

/// Post and comment bodies
pub const MAX_CONTENT_LEN: usize = 2000;

/// Street addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a class stage value
pub fn validate_class_stage(value: &str) -> Result<(), AppError> {
    match value {
        "secondary" | "university" | "graduation" => Ok(()),
        other => Err(AppError::validation(format!(
            "Unknown class stage: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank_and_oversized() {
        assert!(validate_required_text("Mina George", "full_name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "full_name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "full_name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("short".into()), "notes", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "notes", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn class_stage_is_closed_set() {
        assert!(validate_class_stage("university").is_ok());
        assert!(validate_class_stage("kindergarten").is_err());
    }
}
