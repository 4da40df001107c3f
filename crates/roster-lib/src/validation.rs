//! Field rules shared by the record kinds.
//!
//! Each helper appends to a caller-owned error list so a record reports
//! every violated rule at once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// Longest name any kind accepts.
pub const MAX_NAME_LEN: usize = 100;

static CHARACTER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑüÜ\s'-]+$").expect("character name pattern is valid")
});

/// Name rule for warriors, mages and enemies: letters (including Spanish
/// accented letters), whitespace, hyphens and apostrophes.
pub fn character_name(name: &str, errors: &mut Vec<ValidationError>) {
    plain_name(name, errors);
    if !name.is_empty() && !CHARACTER_NAME.is_match(name) {
        errors.push(ValidationError::new(
            "name",
            "may only contain letters, spaces, hyphens and apostrophes",
        ));
    }
}

/// Name rule for items: required and bounded.
pub fn plain_name(name: &str, errors: &mut Vec<ValidationError>) {
    if name.trim().is_empty() {
        errors.push(ValidationError::new("name", "cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        errors.push(ValidationError::new(
            "name",
            format!("exceeds {MAX_NAME_LEN} characters"),
        ));
    }
}

pub fn non_negative(field: &str, value: i64, errors: &mut Vec<ValidationError>) {
    if value < 0 {
        errors.push(ValidationError::new(field, "must be at least 0"));
    }
}

/// Turn the collected list into the `Record::validate` result.
///
/// # Errors
///
/// Returns the list itself when it is non-empty.
pub fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
