use serde::Deserialize;
use validator::Validate;

use super::FormErrors;

pub const TEXT_LABEL: &str = "Comment";

/// Comment form; only `text` is accepted.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    #[serde(skip)]
    pub errors: FormErrors,
}

impl CommentForm {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Trim and validate; the cleaned text on success, errors kept on the
    /// form otherwise.
    pub fn clean(&mut self) -> Option<String> {
        self.text = self.text.trim().to_string();
        match self.validate() {
            Ok(()) => Some(self.text.clone()),
            Err(e) => {
                self.errors = FormErrors::from(e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::REQUIRED;

    #[test]
    fn test_blank_comment_rejected() {
        let mut form = CommentForm::with_text("   \n ");
        assert_eq!(form.clean(), None);
        assert_eq!(form.errors.field("text"), [REQUIRED.to_string()]);
    }

    #[test]
    fn test_comment_trimmed() {
        let mut form = CommentForm::with_text("  nice post \n");
        assert_eq!(form.clean().as_deref(), Some("nice post"));
        assert!(form.errors.is_empty());
    }
}
