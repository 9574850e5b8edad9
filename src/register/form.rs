use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::users::params::NewUserParams;
use crate::users::validation;

use super::client::{ClientError, Navigator, UserApi};

pub const FIRST_NAME_REQUIRED: &str = "Please input your first name!";
pub const FIRST_NAME_LETTERS: &str = "First name may only contain letters";
pub const LAST_NAME_REQUIRED: &str = "Please input your last name!";
pub const LAST_NAME_LETTERS: &str = "Last name may only contain letters";
pub const EMAIL_REQUIRED: &str = "Please input your email!";
pub const EMAIL_INVALID: &str = "Please input a valid email!";
pub const PASSWORD_REQUIRED: &str = "Please input your password!";
pub const CONFIRMATION_REQUIRED: &str = "Please confirm your password!";
pub const CONFIRMATION_MISMATCH: &str = "The two passwords do not match!";

/// Where a successful registration sends the user.
pub const AFTER_REGISTER_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    PasswordConfirmation,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Password,
        Field::PasswordConfirmation,
    ];

    /// Attribute name, shared by the form inputs and the API error map.
    pub fn attribute(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Email => "email",
            Field::Password => "password",
            Field::PasswordConfirmation => "password_confirmation",
        }
    }

    pub fn from_attribute(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.attribute() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::PasswordConfirmation => "Confirm Password",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Field::Password | Field::PasswordConfirmation)
    }
}

/// One snapshot of what the user has typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::PasswordConfirmation => &self.password_confirmation,
        }
    }

    /// New snapshot with `field` replaced.
    pub fn with(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            Field::FirstName => &mut next.first_name,
            Field::LastName => &mut next.last_name,
            Field::Email => &mut next.email,
            Field::Password => &mut next.password,
            Field::PasswordConfirmation => &mut next.password_confirmation,
        };
        *slot = value.into();
        next
    }
}

impl From<&RegisterFields> for NewUserParams {
    fn from(fields: &RegisterFields) -> Self {
        NewUserParams {
            first_name: Some(fields.first_name.clone()),
            last_name: Some(fields.last_name.clone()),
            email: Some(fields.email.clone()),
            password: Some(fields.password.clone()),
            password_confirmation: Some(fields.password_confirmation.clone()),
            admin: None,
        }
    }
}

/// Every field mapped to its first failing rule, or `None` when it passes.
pub type FieldErrors = BTreeMap<Field, Option<&'static str>>;

pub fn validate(fields: &RegisterFields) -> FieldErrors {
    Field::ALL
        .into_iter()
        .map(|field| (field, validate_field(fields, field)))
        .collect()
}

pub fn has_errors(errors: &FieldErrors) -> bool {
    errors.values().any(Option::is_some)
}

fn validate_field(fields: &RegisterFields, field: Field) -> Option<&'static str> {
    let value = fields.get(field);
    match field {
        Field::FirstName if value.is_empty() => Some(FIRST_NAME_REQUIRED),
        Field::FirstName if !validation::is_letters(value) => Some(FIRST_NAME_LETTERS),
        Field::LastName if value.is_empty() => Some(LAST_NAME_REQUIRED),
        Field::LastName if !validation::is_letters(value) => Some(LAST_NAME_LETTERS),
        Field::Email if value.is_empty() => Some(EMAIL_REQUIRED),
        Field::Email if !validation::is_email(value) => Some(EMAIL_INVALID),
        Field::Password if value.is_empty() => Some(PASSWORD_REQUIRED),
        Field::PasswordConfirmation if value.is_empty() => Some(CONFIRMATION_REQUIRED),
        Field::PasswordConfirmation if value != fields.password => Some(CONFIRMATION_MISMATCH),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Pristine,
    Valid,
    Invalid(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    NavigatedAway,
    ErrorReported,
}

#[derive(Debug)]
pub enum SubmitError {
    /// Client-side rules failed; nothing was sent.
    Invalid(FieldErrors),
    /// `create_user` failed. Already reported on the diagnostic channel.
    Api(ClientError),
    /// The form already navigated away.
    Finished,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Invalid(errors) => {
                let failing: Vec<&str> = errors
                    .iter()
                    .filter(|(_, e)| e.is_some())
                    .map(|(f, _)| f.attribute())
                    .collect();
                write!(f, "Invalid fields: {}", failing.join(", "))
            }
            SubmitError::Api(err) => write!(f, "Registration failed: {err}"),
            SubmitError::Finished => write!(f, "Form already submitted"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Registration form: field values, which fields were touched and the
/// derived errors. Errors are recomputed from scratch on every change.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    fields: RegisterFields,
    touched: BTreeSet<Field>,
    errors: FieldErrors,
    state: FormState,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterForm {
    pub fn new() -> Self {
        let fields = RegisterFields::default();
        let errors = validate(&fields);
        Self {
            fields,
            touched: BTreeSet::new(),
            errors,
            state: FormState::Editing,
        }
    }

    pub fn fields(&self) -> &RegisterFields {
        &self.fields
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields = self.fields.with(field, value);
        self.touched.insert(field);
        // Confirmation depends on password, so validate the whole snapshot
        self.errors = validate(&self.fields);
    }

    pub fn touch_all(&mut self) {
        self.touched.extend(Field::ALL);
    }

    pub fn field_state(&self, field: Field) -> FieldState {
        if !self.touched.contains(&field) {
            return FieldState::Pristine;
        }
        match self.errors.get(&field).copied().flatten() {
            Some(message) => FieldState::Invalid(message),
            None => FieldState::Valid,
        }
    }

    /// Visible error for `field`; pristine fields show none.
    pub fn error(&self, field: Field) -> Option<&'static str> {
        match self.field_state(field) {
            FieldState::Invalid(message) => Some(message),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, FormState::Editing | FormState::ErrorReported)
            && Field::ALL.iter().all(|f| self.error(*f).is_none())
    }

    pub async fn submit<A, N>(&mut self, api: &A, navigator: &mut N) -> Result<(), SubmitError>
    where
        A: UserApi + ?Sized,
        N: Navigator + ?Sized,
    {
        if self.state == FormState::NavigatedAway {
            return Err(SubmitError::Finished);
        }

        self.touch_all();
        if has_errors(&self.errors) {
            self.state = FormState::Editing;
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        self.state = FormState::Submitting;
        let f = &self.fields;
        let result = api
            .create_user(
                &f.first_name,
                &f.last_name,
                &f.email,
                &f.password,
                &f.password_confirmation,
            )
            .await;

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Registered");
                navigator.navigate(AFTER_REGISTER_PATH);
                self.state = FormState::NavigatedAway;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Registration failed");
                self.state = FormState::ErrorReported;
                Err(SubmitError::Api(err))
            }
        }
    }
}
