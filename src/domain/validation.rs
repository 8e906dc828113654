//! Input normalization and validation rules for accounts, posts and comments.

use crate::error::{AppError, AppResult};
use validator::{Validate, ValidateEmail, ValidationErrors};

pub const NAME_MAX_CHARS: u64 = 40;
pub const PASSWORD_MIN_CHARS: u64 = 8;
pub const POST_MAX_CHARS: usize = 500;
pub const COMMENT_MAX_CHARS: usize = 500;

/// Account fields as checked at signup, after normalization.
///
/// The name bound mirrors [`NAME_MAX_CHARS`] and the password bound [`PASSWORD_MIN_CHARS`].
#[derive(Debug, Validate)]
pub struct AccountFields {
    #[validate(length(min = 1, max = 40, message = "Name must be between 1 and 40 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password cannot be less than 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Please enter day in date of birth"))]
    pub day: String,
    #[validate(length(min = 1, message = "Please enter month of your date of birth"))]
    pub month: String,
    #[validate(length(min = 1, message = "Please enter year of your date of birth"))]
    pub year: String,
}

/// Trims the name and upper-cases the first letter of each space-separated word.
pub fn normalize_name(raw: &str) -> String {
    raw.trim()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn validate_account(fields: &AccountFields) -> AppResult<()> {
    fields.validate().map_err(|e| AppError::Validation(first_message(&e)))
}

pub fn validate_name(name: &str) -> AppResult<()> {
    let len = name.chars().count() as u64;
    if len == 0 || len > NAME_MAX_CHARS {
        return Err(AppError::validation(format!(
            "Name must be between 1 and {} characters",
            NAME_MAX_CHARS
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !email.to_string().validate_email() {
        return Err(AppError::validation("Please enter valid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if (password.chars().count() as u64) < PASSWORD_MIN_CHARS {
        return Err(AppError::validation(
            "password cannot be less than 8 characters",
        ));
    }
    Ok(())
}

/// Post content must hold 1..=500 characters.
pub fn validate_post_content(content: &str) -> AppResult<()> {
    let len = content.chars().count();
    if len == 0 || len > POST_MAX_CHARS {
        return Err(AppError::validation(
            "Content must be between 1 and 500 characters.",
        ));
    }
    Ok(())
}

/// Returns the trimmed comment body, or a validation error if it is empty or too long.
pub fn normalize_comment(content: &str) -> AppResult<String> {
    let trimmed = content.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > COMMENT_MAX_CHARS {
        return Err(AppError::validation(
            "Comment must be between 1 and 500 characters.",
        ));
    }
    Ok(trimmed.to_string())
}

/// Picks a deterministic message (first field in name order) from a validator report.
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}
