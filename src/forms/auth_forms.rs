use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use super::{FormErrors, REQUIRED};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// First path segments owned by fixed routes; a profile there would be unreachable.
pub const RESERVED_USERNAMES: [&str; 12] = [
    "new", "follow", "group", "auth", "about", "admin", "static", "media", "about-us", "terms",
    "about-author", "about-spec",
];

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 150,
        message = "Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only."
    ))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 8, message = "This password is too short. It must contain at least 8 characters."))]
    pub password1: String,
    #[serde(default)]
    #[validate(must_match(other = "password1", message = "The two password fields didn't match."))]
    pub password2: String,
    #[serde(skip)]
    pub errors: FormErrors,
}

impl SignupForm {
    /// Normalize and validate. Leaves errors on the form when invalid.
    pub fn clean(&mut self) -> bool {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.username = self.username.trim().to_string();
        self.email = self
            .email
            .take()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };

        if !self.username.is_empty() && !errors.has("username") {
            if !USERNAME_RE.is_match(&self.username) {
                errors.add(
                    "username",
                    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                );
            } else if RESERVED_USERNAMES.contains(&self.username.to_lowercase().as_str()) {
                errors.add("username", "This username is not available.");
            }
        }
        if !self.password1.is_empty() && self.password1.chars().all(|c| c.is_ascii_digit()) {
            errors.add("password1", "This password is entirely numeric.");
        }

        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(skip)]
    pub errors: FormErrors,
}

impl LoginForm {
    pub fn clean(&mut self) -> bool {
        self.username = self.username.trim().to_string();
        let mut errors = FormErrors::default();
        if self.username.is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }

    pub fn reject_credentials(&mut self) {
        self.errors.add_non_field(
            "Please enter a correct username and password. Note that both fields may be case-sensitive.",
        );
    }
}

/// Only same-site absolute paths are honoured as post-login targets.
pub fn safe_next(next: Option<&str>) -> Option<String> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
        .map(str::to_string)
}
