use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

use crate::config::RegistrationMode;
use crate::error::AppError;
use crate::register::form::{self, Field, FieldErrors, RegisterFields, AFTER_REGISTER_PATH};
use crate::state::SharedState;
use crate::users;
use crate::users::params::NewUserParams;
use crate::users::validation::ValidationErrors;

struct InputView {
    name: &'static str,
    label: &'static str,
    kind: &'static str,
    /// Empty when the input has no pattern.
    pattern: &'static str,
    value: String,
    /// Empty when the input is valid.
    error: String,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    inputs: Vec<InputView>,
}

impl RegisterTemplate {
    fn build(fields: &RegisterFields, errors: &[(Field, String)]) -> Self {
        let inputs = Field::ALL
            .into_iter()
            .map(|field| InputView {
                name: field.attribute(),
                label: field.label(),
                kind: match field {
                    Field::Email => "email",
                    f if f.is_secret() => "password",
                    _ => "text",
                },
                pattern: match field {
                    Field::FirstName | Field::LastName => "[A-Za-z]+",
                    _ => "",
                },
                // Secrets are never echoed back
                value: if field.is_secret() {
                    String::new()
                } else {
                    fields.get(field).to_string()
                },
                error: errors
                    .iter()
                    .find(|(f, _)| *f == field)
                    .map(|(_, message)| message.clone())
                    .unwrap_or_default(),
            })
            .collect();
        Self { inputs }
    }

    fn into_html(self) -> Result<Html<String>, AppError> {
        self.render()
            .map(Html)
            .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
    }
}

fn client_errors(errors: &FieldErrors) -> Vec<(Field, String)> {
    errors
        .iter()
        .filter_map(|(field, message)| message.map(|m| (*field, m.to_string())))
        .collect()
}

/// Server rule failures keyed by attribute; unknown attributes are dropped.
fn server_errors(errors: &ValidationErrors) -> Vec<(Field, String)> {
    errors
        .fields()
        .filter_map(|name| {
            let field = Field::from_attribute(name)?;
            let messages = errors.get(name)?.join(", ");
            Some((field, format!("{} {messages}", field.label())))
        })
        .collect()
}

fn ensure_open(state: &SharedState) -> Result<(), AppError> {
    if state.config.registration == RegistrationMode::Closed {
        return Err(AppError::Forbidden("Registration is disabled".to_string()));
    }
    Ok(())
}

pub async fn page(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    ensure_open(&state)?;
    RegisterTemplate::build(&RegisterFields::default(), &[]).into_html()
}

pub async fn submit(
    State(state): State<SharedState>,
    Form(fields): Form<RegisterFields>,
) -> Result<Response, AppError> {
    ensure_open(&state)?;

    let errors = form::validate(&fields);
    if form::has_errors(&errors) {
        let page = RegisterTemplate::build(&fields, &client_errors(&errors)).into_html()?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let created = match NewUserParams::from(&fields).validate_registration() {
        Ok(new_user) => users::create(&state.pool, new_user).await,
        Err(errors) => Err(AppError::Validation(errors)),
    };

    match created {
        Ok(_) => Ok(Redirect::to(AFTER_REGISTER_PATH).into_response()),
        Err(AppError::Validation(errors)) => {
            let page = RegisterTemplate::build(&fields, &server_errors(&errors)).into_html()?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Err(err) => Err(err),
    }
}
