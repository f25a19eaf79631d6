//! Asset download port.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::UpscaleError;

/// Port for downloading a remote image asset.
#[async_trait]
pub trait AssetFetcherPort: Send + Sync {
    /// Downloads the resource at `url` with a single GET.
    async fn fetch(&self, url: &str) -> Result<Bytes, UpscaleError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Mock fetcher returning a fixed response and recording requested URLs.
    pub struct MockAssetFetcher {
        response: Result<Bytes, UpscaleError>,
        requests: Mutex<Vec<String>>,
    }

    impl MockAssetFetcher {
        pub fn returning(bytes: impl Into<Bytes>) -> Self {
            Self {
                response: Ok(bytes.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                response: Err(UpscaleError::fetch(message)),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AssetFetcherPort for MockAssetFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, UpscaleError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }
}
