//! Request field normalization and checks shared by auth and profile routes.

use lazy_regex::regex_is_match;
use unicode_normalization::UnicodeNormalization;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Trim, NFKC-normalize and lowercase so visually identical addresses
/// compare equal.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Normalized email, or `INVALID_EMAIL`.
pub fn validate_email(raw: &str) -> Result<String, AppError> {
    let email = normalize_email(raw);
    if email.is_empty() {
        return Err(AppError::invalid(ErrorCode::InvalidEmail, "Email is required"));
    }
    if !regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", &email) {
        return Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "Email address is not valid",
        ));
    }
    Ok(email)
}

/// Trimmed value of a required text field, or `MISSING_FIELD`.
pub fn required_text<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::invalid(
            ErrorCode::MissingField,
            format!("Missing required field: {field}"),
        )),
    }
}

/// Strictly positive, finite amount, or `INVALID_AMOUNT`.
pub fn positive_amount(field: &str, value: Option<f64>) -> Result<f64, AppError> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(_) => Err(AppError::invalid(
            ErrorCode::InvalidAmount,
            format!("{field} must be a positive number"),
        )),
        None => Err(AppError::invalid(
            ErrorCode::MissingField,
            format!("Missing required field: {field}"),
        )),
    }
}
