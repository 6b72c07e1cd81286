// Forms - field allow-lists, labels and validation for every user input

pub mod auth_forms;
pub mod comment_form;
pub mod errors;
pub mod post_form;

pub use auth_forms::{LoginForm, SignupForm};
pub use comment_form::CommentForm;
pub use errors::FormErrors;
pub use post_form::{CleanedPost, GroupChoice, PostForm, UploadedFile, ValidImage};

/// Message used for every missing required field.
pub const REQUIRED: &str = "This field is required.";
