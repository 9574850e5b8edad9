use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{self, ValidationErrors};

/// `{ "user": { ... } }`, the request body of every user write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope<T> {
    pub user: T,
}

/// Attributes accepted on create. Everything is optional at the wire level so
/// that a missing attribute surfaces as a field error instead of a body
/// rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUserParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub admin: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ValidNewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub admin: bool,
}

impl NewUserParams {
    pub fn validate(self) -> Result<ValidNewUser, ValidationErrors> {
        let errors = self.collect_errors();
        self.into_valid(errors)
    }

    /// Self-service sign-up: names are letters only and `admin` is ignored.
    pub fn validate_registration(mut self) -> Result<ValidNewUser, ValidationErrors> {
        let mut errors = self.collect_errors();
        validation::check_letters(&mut errors, "first_name", self.first_name.as_deref());
        validation::check_letters(&mut errors, "last_name", self.last_name.as_deref());
        self.admin = None;
        self.into_valid(errors)
    }

    fn collect_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "first_name", self.first_name.as_deref());
        validation::require(&mut errors, "last_name", self.last_name.as_deref());
        validation::check_email(&mut errors, self.email.as_deref());
        validation::require(&mut errors, "password", self.password.as_deref());
        validation::check_confirmation(
            &mut errors,
            self.password.as_deref(),
            self.password_confirmation.as_deref(),
        );
        errors
    }

    fn into_valid(self, errors: ValidationErrors) -> Result<ValidNewUser, ValidationErrors> {
        errors.into_result(())?;
        Ok(ValidNewUser {
            first_name: self.first_name.unwrap_or_default().trim().to_string(),
            last_name: self.last_name.unwrap_or_default().trim().to_string(),
            email: self.email.unwrap_or_default().trim().to_string(),
            password: self.password.unwrap_or_default(),
            admin: self.admin.unwrap_or(false),
        })
    }
}

/// Attributes accepted on a partial update.
///
/// The outer `Option` records whether the key was present in the body, the
/// inner one whether it was `null`. Absent keys are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserChanges {
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub password_confirmation: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub admin: Option<Option<bool>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub admin: Option<bool>,
}

impl ValidChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl UserChanges {
    pub fn validate(self) -> Result<ValidChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(first_name) = &self.first_name {
            validation::require(&mut errors, "first_name", first_name.as_deref());
        }
        if let Some(last_name) = &self.last_name {
            validation::require(&mut errors, "last_name", last_name.as_deref());
        }
        if let Some(email) = &self.email {
            validation::check_email(&mut errors, email.as_deref());
        }
        if let Some(password) = &self.password {
            validation::require(&mut errors, "password", password.as_deref());
            validation::check_confirmation(
                &mut errors,
                password.as_deref(),
                self.password_confirmation.as_ref().and_then(|c| c.as_deref()),
            );
        }
        if let Some(None) = self.admin {
            errors.add("admin", validation::BLANK);
        }

        errors.into_result(())?;

        Ok(ValidChanges {
            first_name: self.first_name.flatten().map(|v| v.trim().to_string()),
            last_name: self.last_name.flatten().map(|v| v.trim().to_string()),
            email: self.email.flatten().map(|v| v.trim().to_string()),
            password: self.password.flatten(),
            admin: self.admin.flatten(),
        })
    }
}
