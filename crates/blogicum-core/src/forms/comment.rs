use super::require;
use crate::error::ValidationErrors;

#[derive(Debug, Clone, Default)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "text", &self.text);
        errors
    }
}

/// Explicit confirmation required before deleting a post or comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmForm {
    pub confirm: bool,
}

impl ConfirmForm {
    pub fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if !self.confirm {
            errors.add("confirm", super::REQUIRED);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_comment_rejected() {
        let form = CommentForm {
            text: "   \n".into(),
        };
        assert!(form.check().has("text"));
    }

    #[test]
    fn test_confirmation_required() {
        assert!(ConfirmForm { confirm: false }.check().has("confirm"));
        assert!(ConfirmForm { confirm: true }.check().is_empty());
    }
}
