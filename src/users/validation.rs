use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const BLANK: &str = "can't be blank";
pub const INVALID: &str = "is invalid";
pub const TAKEN: &str = "has already been taken";
pub const CONFIRMATION_MISMATCH: &str = "doesn't match Password";
pub const LETTERS_ONLY: &str = "may only contain letters";

pub static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9-]+(\.[a-z0-9-]+)*\.[a-z]{2,}$").unwrap()
});

pub static LETTERS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());

/// Field name -> messages, keyed in field-name order.
///
/// Serializes as a bare object so it can be nested under `errors.fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field} {}", messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_letters(value: &str) -> bool {
    LETTERS_RE.is_match(value)
}

/// Presence check shared by create and update.
pub fn require(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if is_blank(value) {
        errors.add(field, BLANK);
    }
}

pub fn check_email(errors: &mut ValidationErrors, value: Option<&str>) {
    match value {
        Some(email) if !email.trim().is_empty() => {
            if !is_email(email) {
                errors.add("email", INVALID);
            }
        }
        _ => errors.add("email", BLANK),
    }
}

pub fn check_confirmation(
    errors: &mut ValidationErrors,
    password: Option<&str>,
    confirmation: Option<&str>,
) {
    if let Some(confirmation) = confirmation {
        if password != Some(confirmation) {
            errors.add("password_confirmation", CONFIRMATION_MISMATCH);
        }
    }
}

pub fn check_letters(errors: &mut ValidationErrors, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.trim().is_empty() && !is_letters(v) {
            errors.add(field, LETTERS_ONLY);
        }
    }
}
