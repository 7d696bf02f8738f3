//! Field-level validation rules applied before mutations commit.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DomainError, DomainResult, FieldError};

/// Minimum length, in characters, for passwords, titles and contents.
pub const MIN_TEXT_LENGTH: usize = 5;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid")
});

/// Whether `email` has a standard address shape.
pub fn is_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

/// Whether `value` is non-empty and at least `min` characters long.
pub fn has_min_length(value: &str, min: usize) -> bool {
    !value.is_empty() && value.chars().count() >= min
}

/// Accumulates field messages and turns them into a single failure.
#[derive(Debug, Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.0.push(FieldError::new(message));
        }
    }

    fn finish(self) -> DomainResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.0))
        }
    }
}

/// Rules for registering a user.
pub fn validate_registration(email: &str, password: &str) -> DomainResult<()> {
    let mut violations = Violations::default();
    violations.check(is_email(email), "Invalid Email");
    violations.check(has_min_length(password, MIN_TEXT_LENGTH), "Invalid password");
    violations.finish()
}

/// Rules for creating or updating a post.
pub fn validate_post(title: &str, content: &str) -> DomainResult<()> {
    let mut violations = Violations::default();
    violations.check(has_min_length(title, MIN_TEXT_LENGTH), "Title is invalid");
    violations.check(has_min_length(content, MIN_TEXT_LENGTH), "Content is invalid");
    violations.finish()
}
