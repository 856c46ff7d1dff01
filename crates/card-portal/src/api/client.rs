use std::time::Duration;

use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use super::envelope::{ApiEnvelope, ApplicationList};
use super::{ApiError, ApplicationsApi, AuthApi};
use crate::config::ApiConfig;
use crate::domain::{
    Application, ApplicationId, ApplicationSubmission, AuthGrant, AuthTokens, Credentials,
    StatusUpdate, SubmissionReceipt,
};

/// `reqwest`-backed client for the applications API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            access_token: None,
        })
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Endpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "api request");
        let request = self
            .http
            .request(method, url)
            .header(USER_AGENT, HeaderValue::from_static("card-portal"));
        Ok(match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "api transport failure");
            ApiError::from(err)
        })?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok((status, body));
        }

        let explanation = serde_json::from_slice::<ApiEnvelope<IgnoredAny>>(&body)
            .ok()
            .and_then(|envelope| {
                let code = envelope.error.as_ref().and_then(|error| error.code.clone());
                envelope
                    .explanation()
                    .map(|message| (code, message.to_string()))
            });
        warn!(status = status.as_u16(), "api call rejected");

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                ApiError::Unauthorized(explanation.map(|(_, message)| message))
            }
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => ApiError::NotFound(
                explanation
                    .map(|(_, message)| message)
                    .unwrap_or_else(|| "Application not found".to_string()),
            ),
            _ => {
                let (code, message) = explanation.unwrap_or_else(|| {
                    (
                        None,
                        status
                            .canonical_reason()
                            .unwrap_or("request failed")
                            .to_string(),
                    )
                });
                ApiError::Rejected {
                    status: status.as_u16(),
                    code,
                    message,
                }
            }
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let (status, body) = self.execute(request).await?;
        let envelope: ApiEnvelope<T> =
            serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        envelope.into_data(status.as_u16())
    }

    async fn send_json<B, T>(&self, request: RequestBuilder, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(request.json(body)).await
    }
}

impl ApplicationsApi for HttpApi {
    async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        let request = self.request(Method::GET, &["applications", "my"])?;
        let list: ApplicationList = self.fetch(request).await?;
        Ok(list.into())
    }

    async fn application(&self, id: &ApplicationId) -> Result<Application, ApiError> {
        let request = self.request(Method::GET, &["applications", id.0.as_str()])?;
        self.fetch(request).await
    }

    async fn track(&self, application_number: &str) -> Result<Application, ApiError> {
        let request = self.request(
            Method::GET,
            &["applications", "track", application_number.trim()],
        )?;
        self.fetch(request).await
    }

    async fn submit(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<SubmissionReceipt, ApiError> {
        let request = self.request(Method::POST, &["applications"])?;
        let receipt: SubmissionReceipt = self.send_json(request, submission).await?;
        debug!(application_number = %receipt.application_number, "application submitted");
        Ok(receipt)
    }

    async fn all_applications(&self) -> Result<Vec<Application>, ApiError> {
        let request = self.request(Method::GET, &["applications"])?;
        let list: ApplicationList = self.fetch(request).await?;
        Ok(list.into())
    }

    async fn update_status(
        &self,
        id: &ApplicationId,
        update: &StatusUpdate,
    ) -> Result<(), ApiError> {
        let request = self.request(Method::PATCH, &["applications", id.0.as_str()])?;
        let (status, body) = self.execute(request.json(update)).await?;
        let envelope: ApiEnvelope<IgnoredAny> =
            serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        envelope.into_ack(status.as_u16())
    }
}

impl AuthApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        let request = self.request(Method::POST, &["auth", "login"])?;
        self.send_json(request, credentials).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        let request = self.request(Method::POST, &["auth", "register"])?;
        self.send_json(request, credentials).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let request = self.request(Method::POST, &["auth", "refresh"])?;
        self.send_json(request, &json!({ "refreshToken": refresh_token }))
            .await
    }
}
