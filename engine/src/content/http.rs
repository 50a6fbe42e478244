use super::source::ContentSource;
use crate::common::FetchError;
use crate::model::{DecodedImage, ThemeDescriptor};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`ContentSource`] talking HTTP(S) to the content root.
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpContentSource {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::RequestFailed {
                url: String::new(),
                reason: format!("HTTP client creation failed: {e}"),
            })?;
        Ok(Self { client, timeout })
    }

    /// Uses an already configured client.
    pub fn from_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn request_error(&self, url: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            FetchError::RequestFailed {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_descriptor(&self, url: &str) -> Result<ThemeDescriptor, FetchError> {
        self.get(url)
            .await?
            .json::<ThemeDescriptor>()
            .await
            .map_err(|e| {
                if e.is_decode() {
                    FetchError::InvalidResponse {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                } else {
                    self.request_error(url, e)
                }
            })
    }

    async fn fetch_image(&self, url: &str) -> Result<DecodedImage, FetchError> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| self.request_error(url, e))?;

        Ok(DecodedImage::new(url, bytes.to_vec()))
    }
}
