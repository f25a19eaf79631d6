//! HTTP asset fetcher.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::domain::errors::UpscaleError;
use crate::domain::ports::AssetFetcherPort;

/// Downloads emoji assets with a single GET per request.
#[derive(Debug, Clone)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, UpscaleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpscaleError::fetch(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetFetcherPort for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, UpscaleError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UpscaleError::fetch(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpscaleError::fetch(format!("unexpected status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpscaleError::fetch(format!("failed to read body: {e}")))?;
        debug!(url, len = body.len(), "Fetched asset");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn fetcher() -> HttpAssetFetcher {
        HttpAssetFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mut server = Server::new_async().await;
        let body = vec![0x89, 0x50, 0x4E, 0x47];
        let mock = server
            .mock("GET", "/emojis/123.png")
            .match_query(Matcher::UrlEncoded("size".into(), "128".into()))
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(&body)
            .create_async()
            .await;

        let url = format!("{}/emojis/123.png?size=128", server.url());
        let result = fetcher().fetch(&url).await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), Bytes::from(body));
    }

    #[tokio::test]
    async fn test_not_found_is_fetch_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/emojis/1.png")
            .with_status(404)
            .create_async()
            .await;

        let result = fetcher().fetch(&format!("{}/emojis/1.png", server.url())).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(UpscaleError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_connection_error_is_fetch_error() {
        let result = fetcher().fetch("http://127.0.0.1:9/emojis/1.png").await;
        assert!(matches!(result, Err(UpscaleError::Fetch { .. })));
    }
}
