use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::domain::Application;

/// Standard response wrapper: `{ success, message?, data, error? }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

impl<T> ApiEnvelope<T> {
    /// Best human-readable explanation the server gave, if any.
    pub fn explanation(&self) -> Option<&str> {
        self.error
            .as_ref()
            .map(|error| error.message.as_str())
            .or(self.message.as_deref())
    }

    pub fn into_data(self, status: u16) -> Result<T, ApiError> {
        if !self.success {
            return Err(self.into_rejection(status));
        }
        self.data.ok_or(ApiError::MissingData)
    }

    fn into_rejection(self, status: u16) -> ApiError {
        let message = self
            .explanation()
            .unwrap_or("request was not successful")
            .to_string();
        ApiError::Rejected {
            status,
            code: self.error.and_then(|error| error.code),
            message,
        }
    }
}

impl ApiEnvelope<IgnoredAny> {
    /// For calls whose payload the client does not read back.
    pub fn into_ack(self, status: u16) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(self.into_rejection(status))
        }
    }
}

/// List endpoints answer either with a bare array or `{ applications: [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApplicationList {
    Wrapped { applications: Vec<Application> },
    Bare(Vec<Application>),
}

impl From<ApplicationList> for Vec<Application> {
    fn from(list: ApplicationList) -> Self {
        match list {
            ApplicationList::Wrapped { applications } => applications,
            ApplicationList::Bare(applications) => applications,
        }
    }
}
