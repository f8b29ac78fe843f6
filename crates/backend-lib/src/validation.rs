// ============================
// crates/backend-lib/src/validation.rs
// ============================
//! Field validation for the auth endpoints.
//!
//! Failures are collected per field and reported together in the 400 body,
//! before any store access happens.
use embrace_common::{FieldError, LoginRequest, MenopauseStage, RegisterRequest};
use regex::Regex;
use std::sync::LazyLock;

use crate::auth::password::MIN_PASSWORD_LENGTH;
use crate::error::AppError;

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MIN_AGE: i64 = 18;
const MAX_AGE: i64 = 100;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Case-normalize an email for storage and lookup.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn check_name(errors: &mut Vec<FieldError>, field: &str, value: &str, label: &str) {
    let trimmed = value.trim();
    // character count, not byte length: multibyte names must measure correctly
    let length = trimmed.chars().count();
    if length < MIN_NAME_LENGTH || length > MAX_NAME_LENGTH {
        errors.push(FieldError::new(
            field,
            format!("{label} must be {MIN_NAME_LENGTH}-{MAX_NAME_LENGTH} characters"),
        ));
    }
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    let normalized = normalize_email(email);
    if normalized.len() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(&normalized) {
        errors.push(FieldError::new("email", "Valid email is required"));
    }
}

/// Validate a registration request.
pub fn validate_register(req: &RegisterRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    check_name(&mut errors, "firstName", &req.first_name, "First name");
    check_name(&mut errors, "lastName", &req.last_name, "Last name");
    check_email(&mut errors, &req.email);

    if req.age < MIN_AGE || req.age > MAX_AGE {
        errors.push(FieldError::new(
            "age",
            format!("Age must be between {MIN_AGE}-{MAX_AGE}"),
        ));
    }

    if req.password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        ));
    }

    if req.confirm_password != req.password {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }

    if let Some(stage) = req.menopause_stage.as_deref() {
        if stage.parse::<MenopauseStage>().is_err() {
            errors.push(FieldError::new(
                "menopauseStage",
                "Invalid menopause stage",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Validate a login request.
pub fn validate_login(req: &LoginRequest) -> Result<(), AppError> {
    let mut errors = Vec::new();

    check_email(&mut errors, &req.email);
    if req.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
