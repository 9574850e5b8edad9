use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use backoffice::models::User;
use backoffice::register::form::{
    CONFIRMATION_MISMATCH, CONFIRMATION_REQUIRED, EMAIL_INVALID, FIRST_NAME_LETTERS,
    FIRST_NAME_REQUIRED,
};
use backoffice::register::{
    validate, ClientError, Field, FieldState, FormState, Navigator, RegisterFields, RegisterForm,
    SubmitError, UserApi,
};
use backoffice::users::validation::ValidationErrors;

type Call = (String, String, String, String, String);

/// Records every call; fails when `reject` is set.
#[derive(Default)]
struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    reject: bool,
}

#[async_trait]
impl UserApi for RecordingApi {
    async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<User, ClientError> {
        self.calls.lock().unwrap().push((
            first_name.to_string(),
            last_name.to_string(),
            email.to_string(),
            password.to_string(),
            password_confirmation.to_string(),
        ));

        if self.reject {
            return Err(ClientError::Validation(ValidationErrors::single(
                "email",
                "has already been taken",
            )));
        }

        Ok(User {
            id: Uuid::now_v7(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }
}

#[derive(Default)]
struct RecordingNavigator {
    visited: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, path: &str) {
        self.visited.push(path.to_string());
    }
}

fn filled_form() -> RegisterForm {
    let mut form = RegisterForm::new();
    form.set(Field::FirstName, "John");
    form.set(Field::LastName, "Smith");
    form.set(Field::Email, "John.Smith@Example.COM");
    form.set(Field::Password, "secret");
    form.set(Field::PasswordConfirmation, "secret");
    form
}

// ── validate ────────────────────────────────────────────────────

#[test]
fn validate_accepts_complete_fields() {
    let fields = filled_form().fields().clone();
    assert!(validate(&fields).values().all(Option::is_none));
}

#[test]
fn validate_requires_every_field() {
    let errors = validate(&RegisterFields::default());
    assert_eq!(errors[&Field::FirstName], Some(FIRST_NAME_REQUIRED));
    assert_eq!(errors[&Field::PasswordConfirmation], Some(CONFIRMATION_REQUIRED));
    assert!(Field::ALL.iter().all(|f| errors[f].is_some()));
}

#[test]
fn validate_rejects_digits_in_names() {
    let fields = filled_form().fields().with(Field::FirstName, "John1");
    assert_eq!(validate(&fields)[&Field::FirstName], Some(FIRST_NAME_LETTERS));
}

#[test]
fn validate_rejects_malformed_email() {
    for email in ["john", "john@", "john@example", "@example.com", "jo hn@example.com"] {
        let fields = filled_form().fields().with(Field::Email, email);
        assert_eq!(validate(&fields)[&Field::Email], Some(EMAIL_INVALID), "{email}");
    }
}

#[test]
fn validate_rejects_mismatched_passwords() {
    let fields = filled_form()
        .fields()
        .with(Field::Password, "abc")
        .with(Field::PasswordConfirmation, "xyz");
    assert_eq!(
        validate(&fields)[&Field::PasswordConfirmation],
        Some(CONFIRMATION_MISMATCH)
    );
}

// ── field state ─────────────────────────────────────────────────

#[test]
fn untouched_fields_are_pristine() {
    let form = RegisterForm::new();
    assert_eq!(form.field_state(Field::Email), FieldState::Pristine);
    assert!(form.can_submit());
}

#[test]
fn invalid_touched_field_disables_submit() {
    let mut form = filled_form();
    form.set(Field::FirstName, "John1");

    assert_eq!(
        form.field_state(Field::FirstName),
        FieldState::Invalid(FIRST_NAME_LETTERS)
    );
    assert!(!form.can_submit());

    form.set(Field::FirstName, "John");
    assert_eq!(form.field_state(Field::FirstName), FieldState::Valid);
    assert!(form.can_submit());
}

#[test]
fn changing_password_revalidates_confirmation() {
    let mut form = filled_form();
    assert_eq!(form.field_state(Field::PasswordConfirmation), FieldState::Valid);

    form.set(Field::Password, "changed");
    assert_eq!(
        form.field_state(Field::PasswordConfirmation),
        FieldState::Invalid(CONFIRMATION_MISMATCH)
    );
    assert!(!form.can_submit());
}

// ── submit ──────────────────────────────────────────────────────

#[tokio::test]
async fn submit_calls_create_user_once_then_navigates_home() {
    let api = RecordingApi::default();
    let mut nav = RecordingNavigator::default();
    let mut form = filled_form();

    form.submit(&api, &mut nav).await.unwrap();

    let calls = api.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![(
            "John".to_string(),
            "Smith".to_string(),
            "John.Smith@Example.COM".to_string(),
            "secret".to_string(),
            "secret".to_string(),
        )]
    );
    assert_eq!(nav.visited, vec!["/".to_string()]);
    assert_eq!(form.state(), FormState::NavigatedAway);
}

#[tokio::test]
async fn submit_with_invalid_name_sends_nothing() {
    let api = RecordingApi::default();
    let mut nav = RecordingNavigator::default();
    let mut form = filled_form();
    form.set(Field::FirstName, "John1");

    let err = form.submit(&api, &mut nav).await.unwrap_err();

    assert!(matches!(err, SubmitError::Invalid(ref errors) if errors[&Field::FirstName].is_some()));
    assert!(api.calls.lock().unwrap().is_empty());
    assert!(nav.visited.is_empty());
    assert_eq!(form.state(), FormState::Editing);
}

#[tokio::test]
async fn submit_with_mismatched_passwords_sends_nothing() {
    let api = RecordingApi::default();
    let mut nav = RecordingNavigator::default();
    let mut form = filled_form();
    form.set(Field::Password, "abc");
    form.set(Field::PasswordConfirmation, "xyz");

    let err = form.submit(&api, &mut nav).await.unwrap_err();

    assert!(matches!(err, SubmitError::Invalid(_)));
    assert!(api.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn submit_of_pristine_form_touches_every_field() {
    let api = RecordingApi::default();
    let mut nav = RecordingNavigator::default();
    let mut form = RegisterForm::new();

    assert!(form.submit(&api, &mut nav).await.is_err());

    assert_eq!(form.error(Field::FirstName), Some(FIRST_NAME_REQUIRED));
    assert!(!form.can_submit());
    assert!(api.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_create_is_reported_without_navigation() {
    let api = RecordingApi {
        reject: true,
        ..Default::default()
    };
    let mut nav = RecordingNavigator::default();
    let mut form = filled_form();

    let err = form.submit(&api, &mut nav).await.unwrap_err();

    assert!(matches!(err, SubmitError::Api(ClientError::Validation(_))));
    assert_eq!(api.calls.lock().unwrap().len(), 1);
    assert!(nav.visited.is_empty());
    assert_eq!(form.state(), FormState::ErrorReported);
    // No automatic retry, but the user may submit again
    assert!(form.can_submit());
}

#[tokio::test]
async fn form_cannot_be_submitted_after_navigating_away() {
    let api = RecordingApi::default();
    let mut nav = RecordingNavigator::default();
    let mut form = filled_form();

    form.submit(&api, &mut nav).await.unwrap();
    let err = form.submit(&api, &mut nav).await.unwrap_err();

    assert!(matches!(err, SubmitError::Finished));
    assert_eq!(api.calls.lock().unwrap().len(), 1);
    assert!(!form.can_submit());
}
