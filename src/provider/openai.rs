//! HTTP client for the OpenAI speech API.

use reqwest::StatusCode;
use reqwest::blocking::Response;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Default API root; override with `OPENAI_BASE_URL`.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Speech model that accepts `instructions`.
pub const SPEECH_MODEL: &str = "gpt-4o-mini-tts";

/// Errors that can occur when talking to the speech API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Body of a `POST /audio/speech` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechApiRequest {
    pub model: String,
    pub voice: String,
    pub input: String,
    pub response_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Cloud speech API.
///
/// Abstracts the HTTP transport so providers can be tested with mocks.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechApi {
    /// Synthesize speech, returning the encoded audio bytes.
    fn create_speech(&self, request: &SpeechApiRequest) -> Result<Vec<u8>, ApiError>;

    /// Cheap authenticated call used to verify the credential.
    fn check_credentials(&self) -> Result<(), ApiError>;
}

/// Blocking [`SpeechApi`] client.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Get the API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(status_error(status, &body))
    }
}

/// Error for a non-success response, keeping 401 distinct.
pub fn status_error(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized(body.to_string())
    } else {
        ApiError::RequestFailed(format!("Status: {status}: {body}"))
    }
}

impl SpeechApi for OpenAiClient {
    fn create_speech(&self, request: &SpeechApiRequest) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/audio/speech", self.base_url);
        debug!(url = %url, voice = %request.voice, format = %request.response_format, "Requesting speech");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        Self::check_status(response)?
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    fn check_credentials(&self) -> Result<(), ApiError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        Self::check_status(response).map(|_| ())
    }
}
