//! Workbook source: a local path or an http(s) URL

use crate::error::IngestError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbookSource {
    File(PathBuf),
    Http(Url),
}

impl WorkbookSource {
    /// `http://` and `https://` locations are fetched over the network,
    /// anything else is a filesystem path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => WorkbookSource::Http(url),
            _ => WorkbookSource::File(PathBuf::from(location)),
        }
    }
}

impl fmt::Display for WorkbookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkbookSource::File(path) => write!(f, "{}", path.display()),
            WorkbookSource::Http(url) => write!(f, "{}", url),
        }
    }
}

/// Reads raw workbook bytes from its source
#[derive(Clone)]
pub struct WorkbookFetcher {
    source: WorkbookSource,
    http_client: reqwest::Client,
}

impl WorkbookFetcher {
    pub fn new(source: WorkbookSource, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tpaf-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            source,
            http_client,
        }
    }

    pub fn source(&self) -> &WorkbookSource {
        &self.source
    }

    pub async fn fetch(&self) -> Result<Vec<u8>, IngestError> {
        let location = self.source.to_string();
        let bytes = match &self.source {
            WorkbookSource::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| IngestError::unavailable(&location, e))?,
            WorkbookSource::Http(url) => {
                let response = self
                    .http_client
                    .get(url.clone())
                    .send()
                    .await
                    .map_err(|e| IngestError::unavailable(&location, e))?;

                if !response.status().is_success() {
                    return Err(IngestError::unavailable(
                        &location,
                        format!("HTTP {}", response.status()),
                    ));
                }

                response
                    .bytes()
                    .await
                    .map_err(|e| IngestError::unavailable(&location, e))?
                    .to_vec()
            }
        };

        debug!("Fetched {} bytes from {}", bytes.len(), location);
        Ok(bytes)
    }
}
