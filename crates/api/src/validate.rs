//! Input validators
//!
//! Explicit validator functions invoked at the top of each handler. Failures
//! become [`ApiError::Validation`] (400), never a panic or a framework
//! exception.

use crate::error::ApiError;

/// Username: 4-16 characters from `[A-Za-z0-9_]`.
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    let ok = (4..=16).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(ApiError::Validation("Invalid username".to_string()))
    }
}

/// Password: 8-128 characters, content unrestricted.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if (8..=128).contains(&password.chars().count()) {
        Ok(())
    } else {
        Err(ApiError::Validation("Invalid password".to_string()))
    }
}

fn is_activity_text_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b',' | b'!' | b' ')
}

/// Activity title: 4-16 characters from `[A-Za-z0-9_\-.,! ]`.
pub fn validate_title(title: &str) -> Result<(), ApiError> {
    let ok = (4..=16).contains(&title.len()) && title.bytes().all(is_activity_text_byte);
    if ok {
        Ok(())
    } else {
        Err(ApiError::Validation("Invalid title".to_string()))
    }
}

/// Activity description: 4-128 characters from the same alphabet as titles.
pub fn validate_description(description: &str) -> Result<(), ApiError> {
    let ok = (4..=128).contains(&description.len())
        && description.bytes().all(is_activity_text_byte);
    if ok {
        Ok(())
    } else {
        Err(ApiError::Validation("Invalid description".to_string()))
    }
}

/// Calendar coordinates for history lookups.
pub fn validate_year_month(year: i32, month: i32) -> Result<(), ApiError> {
    if !(1..=9999).contains(&year) {
        return Err(ApiError::Validation("Invalid year".to_string()));
    }
    if !(1..=12).contains(&month) {
        return Err(ApiError::Validation("Invalid month".to_string()));
    }
    Ok(())
}

pub fn validate_day(day: i32) -> Result<(), ApiError> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(ApiError::Validation("Invalid day".to_string()))
    }
}
