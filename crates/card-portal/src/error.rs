use std::fmt;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::session::{Route, SessionError, StoreError};
use crate::telemetry::TelemetryError;
use crate::validation::FieldErrors;
use crate::wizard::WizardError;

/// Where a failure is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSurface {
    /// Next to the offending inputs; the current step stays open.
    Inline(FieldErrors),
    Toast(String),
    Redirect(Route),
}

impl ErrorSurface {
    /// Maps an API failure for a screen. Missing records send the user back to
    /// `not_found`, an expired session to the login screen.
    pub fn for_api(err: &ApiError, fallback: &str, not_found: Route) -> Self {
        match err {
            ApiError::NotFound(_) => ErrorSurface::Redirect(not_found),
            ApiError::Unauthorized(_) => ErrorSurface::Redirect(Route::Login),
            _ => ErrorSurface::Toast(err.user_message(fallback)),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Api(ApiError),
    Session(SessionError),
    Wizard(WizardError),
    Prompt(String),
    Cancelled,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Api(err) => write!(f, "api error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
            AppError::Wizard(err) => write!(f, "wizard error: {}", err),
            AppError::Prompt(message) => write!(f, "input error: {}", message),
            AppError::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Api(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Wizard(err) => Some(err),
            AppError::Prompt(_) | AppError::Cancelled => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ApiError> for AppError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Session(SessionError::Store(value))
    }
}

impl From<WizardError> for AppError {
    fn from(value: WizardError) -> Self {
        Self::Wizard(value)
    }
}
