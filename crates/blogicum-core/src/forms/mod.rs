//! Form validation for user input.
//!
//! Each form reports every problem at once through [`ValidationErrors`].
//! Checks that need storage (references, uniqueness) are added by the
//! services on top of [`check`](PostForm::check).

mod account;
mod comment;
mod post;
mod taxonomy;

pub use account::{LoginForm, PasswordChangeForm, ProfileForm, RegistrationForm};
pub use comment::{CommentForm, ConfirmForm};
pub use post::PostForm;
pub use taxonomy::{CategoryForm, LocationForm};

use crate::error::ValidationErrors;

/// Maximum length of titles and names.
pub const MAX_FIELD_LENGTH: usize = 256;

pub const MAX_SLUG_LENGTH: usize = 64;

/// Maximum length of usernames and personal names.
pub const MAX_NAME_LENGTH: usize = 150;

pub(crate) const REQUIRED: &str = "This field is required.";

pub(crate) fn require(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
        false
    } else {
        true
    }
}

pub(crate) fn max_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters (it has {len})."),
        );
    }
}

/// Letters, digits and `@.+-_` only.
pub(crate) fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// ASCII letters, digits, hyphens and underscores only.
pub(crate) fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_charset() {
        assert!(is_valid_username("ivan.petrov+blog@site_1-x"));
        assert!(is_valid_username("Анна"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("semi;colon"));
    }

    #[test]
    fn test_slug_charset() {
        assert!(is_valid_slug("travel_2024-summer"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("путешествия"));
        assert!(!is_valid_slug("with/slash"));
    }

    #[test]
    fn test_max_length_counts_chars() {
        let mut errors = ValidationErrors::new();
        max_length(&mut errors, "title", &"я".repeat(MAX_FIELD_LENGTH), MAX_FIELD_LENGTH);
        assert!(errors.is_empty());

        max_length(&mut errors, "title", &"я".repeat(MAX_FIELD_LENGTH + 1), MAX_FIELD_LENGTH);
        assert!(errors.has("title"));
    }
}
