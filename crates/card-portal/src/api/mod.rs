//! Remote API boundary.
//!
//! Everything above this module talks to the backend through the
//! [`ApplicationsApi`] and [`AuthApi`] traits so the wizard, session and
//! admin code can be exercised against in-memory doubles.

mod client;
pub mod envelope;

pub use client::HttpApi;
pub use envelope::{ApiEnvelope, ApiErrorBody};

use crate::domain::{
    Application, ApplicationId, ApplicationSubmission, AuthGrant, AuthTokens, Credentials,
    StatusUpdate, SubmissionReceipt,
};

const SIGN_IN_AGAIN: &str = "session expired or missing, please sign in again";

fn unauthorized_message(explanation: &Option<String>) -> &str {
    explanation.as_deref().unwrap_or(SIGN_IN_AGAIN)
}

/// Failure of a single API call. The caller's state is never touched by one.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid API endpoint: {0}")]
    Endpoint(String),
    /// 401. Carries the server's explanation when it sent one, e.g. a bad password.
    #[error("{}", unauthorized_message(.0))]
    Unauthorized(Option<String>),
    #[error("you do not have permission to perform this action")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("unexpected response from server: {0}")]
    Decode(String),
    #[error("server response did not include any data")]
    MissingData,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Message for a toast, falling back to `fallback` for transport-level noise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message, .. } | ApiError::NotFound(message) => message.clone(),
            ApiError::Unauthorized(_) | ApiError::Forbidden => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Application calls, for applicants and admins alike.
#[allow(async_fn_in_trait)]
pub trait ApplicationsApi {
    async fn my_applications(&self) -> Result<Vec<Application>, ApiError>;
    async fn application(&self, id: &ApplicationId) -> Result<Application, ApiError>;
    async fn track(&self, application_number: &str) -> Result<Application, ApiError>;
    async fn submit(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<SubmissionReceipt, ApiError>;
    async fn all_applications(&self) -> Result<Vec<Application>, ApiError>;
    async fn update_status(
        &self,
        id: &ApplicationId,
        update: &StatusUpdate,
    ) -> Result<(), ApiError>;
}

#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError>;
    async fn register(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError>;
    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, ApiError>;
}
