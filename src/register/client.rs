use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::models::User;
use crate::users::params::{NewUserParams, UserEnvelope};
use crate::users::validation::ValidationErrors;

#[derive(Debug)]
pub enum ClientError {
    /// 422 from the server, with its field errors.
    Validation(ValidationErrors),
    Status(StatusCode),
    Transport(reqwest::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Validation(errors) => write!(f, "Rejected: {errors}"),
            ClientError::Status(status) => write!(f, "Unexpected status: {status}"),
            ClientError::Transport(err) => write!(f, "Request failed: {err}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err)
    }
}

/// The user-creation call the registration form submits through.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<User, ClientError>;
}

pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Talks to `POST /api/v1/users`.
pub struct HttpUserApi {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    errors: ErrorFields,
}

#[derive(Deserialize)]
struct ErrorFields {
    fields: ValidationErrors,
}

impl HttpUserApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<User, ClientError> {
        let body = UserEnvelope {
            user: NewUserParams {
                first_name: Some(first_name.to_string()),
                last_name: Some(last_name.to_string()),
                email: Some(email.to_string()),
                password: Some(password.to_string()),
                password_confirmation: Some(password_confirmation.to_string()),
                admin: None,
            },
        };

        let resp = self
            .client
            .post(format!("{}/api/v1/users", self.base_url))
            .json(&body)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => Ok(resp.json::<User>().await?),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body: ErrorBody = resp.json().await?;
                Err(ClientError::Validation(body.errors.fields))
            }
            status => Err(ClientError::Status(status)),
        }
    }
}
