//! Reusable field validators
//!
//! Each validator checks one constraint and reports a per-field message.
//! Callers collect the results so a response can list every problem at once
//! instead of failing on the first field.

use crate::core::error::FieldError;
use regex::Regex;
use std::sync::LazyLock;

/// Pattern an email address must match (case-insensitive `local@domain`).
pub static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\S+@\S+$").expect("email pattern is valid"));

/// Validator: trimmed string length must be within range
pub fn string_length(field: &str, value: &str, min: usize, max: usize) -> Option<FieldError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        Some(FieldError::new(
            field,
            format!("must be between {} and {} characters", min, max),
        ))
    } else {
        None
    }
}

/// Validator: string length must not exceed maximum
pub fn max_length(field: &str, value: &str, max: usize) -> Option<FieldError> {
    if value.chars().count() > max {
        Some(FieldError::new(
            field,
            format!("must not exceed {} characters", max),
        ))
    } else {
        None
    }
}

/// Validator: value must match a pattern
pub fn matches_pattern(
    field: &str,
    value: &str,
    pattern: &Regex,
    expectation: &str,
) -> Option<FieldError> {
    if pattern.is_match(value) {
        None
    } else {
        Some(FieldError::new(field, expectation.to_string()))
    }
}

/// Validator: value must be in allowed list
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Option<FieldError> {
    if allowed.iter().any(|candidate| *candidate == value) {
        None
    } else {
        Some(FieldError::new(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === string_length() ===

    #[test]
    fn test_string_length_too_short_returns_error() {
        let err = string_length("childName", "A", 2, 50);
        assert!(err.is_some());
        assert!(err.unwrap().message.contains("between 2 and 50"));
    }

    #[test]
    fn test_string_length_exact_min_returns_ok() {
        assert!(string_length("childName", "Al", 2, 50).is_none());
    }

    #[test]
    fn test_string_length_exact_max_returns_ok() {
        let name = "a".repeat(50);
        assert!(string_length("childName", &name, 2, 50).is_none());
    }

    #[test]
    fn test_string_length_over_max_returns_error() {
        let name = "a".repeat(51);
        assert!(string_length("childName", &name, 2, 50).is_some());
    }

    #[test]
    fn test_string_length_trims_before_counting() {
        // "  A  " trims to one character, which is below the minimum
        assert!(string_length("childName", "  A  ", 2, 50).is_some());
        assert!(string_length("childName", "  Al  ", 2, 50).is_none());
    }

    // === max_length() ===

    #[test]
    fn test_max_length_within_returns_ok() {
        assert!(max_length("notes", "short note", 500).is_none());
    }

    #[test]
    fn test_max_length_over_returns_error() {
        let notes = "x".repeat(501);
        let err = max_length("notes", &notes, 500);
        assert!(err.is_some());
        assert!(err.unwrap().message.contains("500"));
    }

    // === matches_pattern() ===

    #[test]
    fn test_email_pattern_accepts_simple_address() {
        assert!(matches_pattern("email", "a@b.co", &EMAIL_PATTERN, "invalid").is_none());
    }

    #[test]
    fn test_email_pattern_accepts_upper_case() {
        assert!(matches_pattern("email", "A@B.CO", &EMAIL_PATTERN, "invalid").is_none());
    }

    #[test]
    fn test_email_pattern_rejects_missing_at() {
        let err = matches_pattern(
            "email",
            "not-an-email",
            &EMAIL_PATTERN,
            "must be a valid email address",
        );
        assert!(err.is_some());
        assert_eq!(err.unwrap().message, "must be a valid email address");
    }

    #[test]
    fn test_email_pattern_rejects_spaces() {
        assert!(matches_pattern("email", "a b@c.co", &EMAIL_PATTERN, "invalid").is_some());
    }

    // === one_of() ===

    #[test]
    fn test_one_of_value_in_list_returns_ok() {
        assert!(one_of("storyTemplate", "magic-garden", &["magic-garden"]).is_none());
    }

    #[test]
    fn test_one_of_value_not_in_list_returns_error() {
        let err = one_of(
            "storyTemplate",
            "unknown-template",
            &["enchanted-forest", "princess-dragon", "magic-garden"],
        );
        assert!(err.is_some());
        assert!(err.unwrap().message.contains("enchanted-forest"));
    }
}
