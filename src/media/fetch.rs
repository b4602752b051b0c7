use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::core::mime;

/// Errors that can occur while fetching or decoding an image.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Timeout, DNS or connection failure.
    Network(String),
    /// The server answered with a non-success status.
    Http { status: u16 },
    /// The server answered with something other than an image.
    NotAnImage { content_type: String },
    /// The bytes could not be decoded.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Http { status } => write!(f, "image request failed (HTTP {status})"),
            FetchError::NotAnImage { content_type } => {
                write!(f, "expected an image, got {content_type}")
            }
            FetchError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Downloads the raw bytes at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Image fetch {url} failed: HTTP {status}");
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        // Servers that omit the header are trusted; the decoder has the last word.
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(content_type) = content_type
            && !mime::is_image(&content_type)
            && !content_type.starts_with("application/octet-stream")
        {
            return Err(FetchError::NotAnImage { content_type });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        debug!("Fetched {} bytes from {url}", bytes.len());
        Ok(bytes.to_vec())
    }
}
