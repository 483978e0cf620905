//! Input validation shared by every write endpoint.
//!
//! Each check returns [`CoreError::Validation`] with a message that can be
//! shown to the user as-is.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::Date;

/// Minimum password length accepted at registration and invitation accept.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length (argon2 input is bounded to keep hashing cheap).
pub const MAX_PASSWORD_LENGTH: usize = 100;

/// Maximum length of names, emails and other `VARCHAR(255)` columns.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of a visitor dedication message.
pub const MAX_DEDICATION_LENGTH: usize = 5000;

pub const VISIBILITY_PUBLIC: &str = "public";
pub const VISIBILITY_PRIVATE: &str = "private";

/// Reject empty or whitespace-only required fields.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject values longer than `max` characters.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validate an email address.
///
/// On top of the RFC syntax check the domain must contain a dot, so
/// `user@localhost` is rejected like any other address a family could not
/// actually receive mail at.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let trimmed = email.trim();
    let has_dotted_domain = trimmed
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'));

    if !has_dotted_domain || !trimmed.to_string().validate_email() {
        return Err(CoreError::Validation(format!(
            "'{trimmed}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Lowercase and trim an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate password length bounds.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be less than {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Normalise a visibility value to `public` / `private`.
///
/// Accepts any casing (`PUBLIC`, `Private`, ...).
pub fn validate_visibility(value: &str) -> Result<String, CoreError> {
    let lower = value.trim().to_lowercase();
    match lower.as_str() {
        VISIBILITY_PUBLIC | VISIBILITY_PRIVATE => Ok(lower),
        _ => Err(CoreError::Validation(format!(
            "Invalid visibility '{value}'. Must be one of: {VISIBILITY_PUBLIC}, {VISIBILITY_PRIVATE}"
        ))),
    }
}

/// A death date may not precede the birth date.
pub fn validate_date_order(birth: Option<Date>, death: Option<Date>) -> Result<(), CoreError> {
    if let (Some(birth), Some(death)) = (birth, death) {
        if death < birth {
            return Err(CoreError::Validation(
                "death_date must not be before birth_date".into(),
            ));
        }
    }
    Ok(())
}
