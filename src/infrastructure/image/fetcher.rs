//! HTTP image fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, warn};

use crate::domain::entities::{CacheEntry, CacheKey};
use crate::domain::errors::{CacheError, CacheResult, FetchError};
use crate::domain::ports::ImageFetcherPort;

use super::decode;

/// Default request timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads images with a single unauthenticated GET per call.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: Duration) -> CacheResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("recipeshelf/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::ClientError(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Creates a fetcher around an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn image_content_type(headers: &header::HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let mime = value.split(';').next()?.trim().to_ascii_lowercase();
    mime.starts_with("image/").then_some(mime)
}

#[async_trait]
impl ImageFetcherPort for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<CacheEntry, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Image request failed");
            if e.is_timeout() {
                FetchError::network("request timed out")
            } else if e.is_connect() {
                FetchError::network(format!("failed to connect: {e}"))
            } else {
                FetchError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = %status, "Image request rejected");
            return Err(FetchError::BadResponse {
                status: status.as_u16(),
            });
        }

        let header_type = image_content_type(response.headers());

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::network("request timed out while reading body")
            } else {
                FetchError::network(format!("Failed to read body: {e}"))
            }
        })?;

        let format = decode::validate_image(bytes.clone())
            .await
            .map_err(FetchError::decode)?;

        debug!(url = %url, size = bytes.len(), format = ?format, "Downloaded image");

        let content_type =
            header_type.unwrap_or_else(|| decode::content_type_for(format).to_string());

        Ok(CacheEntry::new(CacheKey::from_url(url), bytes).with_content_type(content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedResponse, TestServer, png_bytes, test_client};

    fn fetcher(timeout: Duration) -> HttpImageFetcher {
        HttpImageFetcher::with_client(test_client(timeout))
    }

    #[tokio::test]
    async fn test_fetch_valid_image() {
        let server = TestServer::start(vec![(
            "/photos/abc/small.png",
            CannedResponse::ok("image/png", png_bytes().to_vec()),
        )])
        .await;
        let url = server.url("/photos/abc/small.png");

        let entry = fetcher(Duration::from_secs(5)).fetch(&url).await.unwrap();

        assert_eq!(entry.bytes, png_bytes());
        assert_eq!(entry.key, CacheKey::from_url(&url));
        assert_eq!(entry.content_type.as_deref(), Some("image/png"));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_content_type_falls_back_to_detected_format() {
        let server = TestServer::start(vec![(
            "/img",
            CannedResponse::ok("application/octet-stream", png_bytes().to_vec()),
        )])
        .await;

        let entry = fetcher(Duration::from_secs(5))
            .fetch(&server.url("/img"))
            .await
            .unwrap();

        assert_eq!(entry.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = TestServer::start(vec![]).await;

        let result = fetcher(Duration::from_secs(5))
            .fetch(&server.url("/missing.jpg"))
            .await;

        assert_eq!(result, Err(FetchError::BadResponse { status: 404 }));
    }

    #[tokio::test]
    async fn test_undecodable_payload() {
        let server = TestServer::start(vec![(
            "/fake.png",
            CannedResponse::ok("image/png", b"<html>oops</html>".to_vec()),
        )])
        .await;

        let result = fetcher(Duration::from_secs(5))
            .fetch(&server.url("/fake.png"))
            .await;

        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = fetcher(Duration::from_secs(5))
            .fetch(&format!("http://{addr}/img.png"))
            .await;

        assert!(matches!(result, Err(FetchError::Network { .. })));
    }

    #[tokio::test]
    async fn test_timeout_is_a_network_failure() {
        let server = TestServer::start(vec![(
            "/slow.png",
            CannedResponse::ok("image/png", png_bytes().to_vec())
                .with_delay(Duration::from_secs(5)),
        )])
        .await;

        let result = fetcher(Duration::from_millis(200))
            .fetch(&server.url("/slow.png"))
            .await;

        assert_eq!(result, Err(FetchError::network("request timed out")));
    }

    #[test]
    fn test_image_content_type_strips_parameters() {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("Image/JPEG; charset=binary"),
        );
        assert_eq!(image_content_type(&headers).as_deref(), Some("image/jpeg"));

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/html"),
        );
        assert_eq!(image_content_type(&headers), None);
    }
}
