//! Field rules shared by every account form.
//!
//! Person names follow a single policy: letters (any script), whitespace,
//! hyphens and apostrophes, up to 150 characters. The same functions back
//! signup, admin create and admin edit.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidateEmail, ValidationError};

use crate::config::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH};

static PERSON_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{L}\s'-]+$").unwrap_or_else(|e| panic!("invalid name pattern: {e}"))
});

static USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.@+-]+$").unwrap_or_else(|e| panic!("invalid username pattern: {e}"))
});

pub const REQUIRED_MESSAGE: &str = "This field is required.";

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn check_person_name(value: &str, label: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(error("required", REQUIRED_MESSAGE));
    }
    if value.chars().count() as u64 > MAX_NAME_LENGTH {
        return Err(error(
            "max_length",
            format!("Ensure this value has at most {MAX_NAME_LENGTH} characters."),
        ));
    }
    if !PERSON_NAME.is_match(value) {
        return Err(error(
            "invalid_name",
            format!("{label} should contain only letters, spaces, hyphens, or apostrophes."),
        ));
    }
    Ok(())
}

/// Name policy applied to `first_name`.
pub fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    check_person_name(value, "First name")
}

/// Name policy applied to `last_name`.
pub fn validate_last_name(value: &str) -> Result<(), ValidationError> {
    check_person_name(value, "Last name")
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error("required", REQUIRED_MESSAGE));
    }
    if value.chars().count() as u64 > MAX_NAME_LENGTH {
        return Err(error(
            "max_length",
            format!("Ensure this value has at most {MAX_NAME_LENGTH} characters."),
        ));
    }
    if !USERNAME.is_match(value) {
        return Err(error(
            "invalid_username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}

/// Minimum length and not entirely numeric.
pub fn validate_password_strength(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error("required", REQUIRED_MESSAGE));
    }
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(error(
            "password_too_short",
            format!(
                "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
            ),
        ));
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return Err(error(
            "password_entirely_numeric",
            "This password is entirely numeric.",
        ));
    }
    Ok(())
}

pub fn validate_email_address(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(error("required", REQUIRED_MESSAGE));
    }
    if value.chars().count() as u64 > MAX_EMAIL_LENGTH {
        return Err(error(
            "max_length",
            format!("Ensure this value has at most {MAX_EMAIL_LENGTH} characters."),
        ));
    }
    if !value.validate_email() {
        return Err(error("invalid_email", "Enter a valid email address."));
    }
    Ok(())
}

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", REQUIRED_MESSAGE));
    }
    Ok(())
}
