//! Input validation for accounts, trees and records.
//!
//! Validators return [`ValidationError`], which converts into
//! [`CoreError::Validation`](crate::error::CoreError::Validation).

use validator::ValidateEmail;

use crate::records::{Choice, ChoiceId};

/// Maximum length of a family tree name.
pub const TREE_NAME_MAX: usize = 50;
/// Maximum length of a username.
pub const USERNAME_MAX: usize = 50;
/// Maximum length of an email address (RFC 5321 path limit).
pub const EMAIL_MAX: usize = 254;
/// Default maximum for short free-text record fields.
pub const TEXT_MAX: usize = 255;
/// Maximum length of a tag name.
pub const TAG_NAME_MAX: usize = 25;
/// Maximum length of an address postal code.
pub const POSTAL_CODE_MAX: usize = 10;
/// Maximum length of a citation page or reference.
pub const PAGE_REFERENCE_MAX: usize = 100;
/// Maximum length of a source's publication info.
pub const PUBINFO_MAX: usize = 500;

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

/// A required text field: not blank and at most `max` characters.
pub fn require_text(field: &'static str, value: &str, max: usize) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    max_chars(field, value, max)
}

/// An optional text field: when present, at most `max` characters.
pub fn optional_text(field: &'static str, value: Option<&str>, max: usize) -> ValidationResult {
    match value {
        Some(v) => max_chars(field, v, max),
        None => Ok(()),
    }
}

/// An optional field that, when present, must also satisfy [`require_text`].
///
/// Used by partial updates of required fields: omitting the field keeps the
/// stored value, sending a blank one is an error.
pub fn replace_text(field: &'static str, value: Option<&str>, max: usize) -> ValidationResult {
    match value {
        Some(v) => require_text(field, v, max),
        None => Ok(()),
    }
}

fn max_chars(field: &'static str, value: &str, max: usize) -> ValidationResult {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// An optional choice column: when present, must name a known variant.
pub fn choice<C: Choice>(value: Option<ChoiceId>) -> ValidationResult {
    match value {
        Some(id) if C::from_id(id).is_none() => {
            let allowed: Vec<String> = C::ALL.iter().map(|c| c.id().to_string()).collect();
            Err(ValidationError::new(
                C::FIELD,
                format!("must be one of {}", allowed.join(", ")),
            ))
        }
        _ => Ok(()),
    }
}

pub fn tree_name(name: &str) -> ValidationResult {
    require_text("name", name, TREE_NAME_MAX)
}

/// Usernames are 1-50 characters of letters, digits and `@ . + - _`.
pub fn username(name: &str) -> ValidationResult {
    require_text("username", name, USERNAME_MAX)?;
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !name.chars().all(allowed) {
        return Err(ValidationError::new(
            "username",
            "may only contain letters, digits and @ . + - _",
        ));
    }
    Ok(())
}

pub fn email(address: &str) -> ValidationResult {
    max_chars("email", address, EMAIL_MAX)?;
    if !address.to_owned().validate_email() {
        return Err(ValidationError::new("email", "is not a valid email address"));
    }
    Ok(())
}
