//! Input validation shared by the services.

use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trim and lowercase an email, then check its shape: exactly one `@` with
/// non-empty local and domain parts, no whitespace.
pub fn email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation(format!("invalid email address '{}'", raw.trim())));
    }
    Ok(email)
}

pub fn password(raw: &str) -> AppResult<()> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Required text field: non-empty after trimming. Returns the trimmed value.
pub fn required(field: &str, raw: &str) -> AppResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Optional text field on update: `None` or blank means "leave unchanged".
pub fn optional(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn salary(value: Option<f64>) -> AppResult<Option<f64>> {
    match value {
        Some(s) if !s.is_finite() || s < 0.0 => Err(AppError::Validation(
            "salary must be a non-negative number".into(),
        )),
        other => Ok(other),
    }
}

/// Parse an enum (or number) field, naming the field on failure.
pub fn parse<T>(field: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
{
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid {field} '{}'", raw.trim())))
}

/// [`parse`] for optional inputs; blank counts as absent.
pub fn parse_opt<T>(field: &str, raw: Option<&str>) -> AppResult<Option<T>>
where
    T: FromStr,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse(field, v).map(Some),
        None => Ok(None),
    }
}
