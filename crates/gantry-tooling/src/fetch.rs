//! Fetching remote content: dependency archives and workflow schemas.
//!
//! `http(s)://` URLs go through a blocking `reqwest` client, `file://` URLs are read
//! straight from disk. There are no retries; a failed fetch is reported as-is and the
//! caller decides how fatal it is.

use std::path::PathBuf;
use std::time::Duration;

use once_cell::sync::OnceCell;
use url::Url;

/// Schemes treated as remote references. Anything else is a local path.
const REMOTE_SCHEMES: [&str; 3] = ["http", "https", "file"];

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to '{url}' failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("'{url}' returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read '{}': {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{url}' is not a valid file URL")]
    InvalidFileUrl { url: String },

    #[error("unsupported URL scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },
}

/// Source of remote bytes.
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Parse `reference` as a remote URL, `None` when it should be treated as a local path.
pub fn remote_url(reference: &str) -> Option<Url> {
    Url::parse(reference)
        .ok()
        .filter(|url| REMOTE_SCHEMES.contains(&url.scheme()))
}

/// Default fetcher over HTTP(S) and `file://`.
#[derive(Debug)]
pub struct HttpFetcher {
    timeout: Duration,
    client: OnceCell<reqwest::blocking::Client>,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    fn client(&self, url: &Url) -> Result<&reqwest::blocking::Client, FetchError> {
        self.client.get_or_try_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .user_agent(concat!("gantry/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| FetchError::Http {
                    url: url.to_string(),
                    source: e,
                })
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| FetchError::InvalidFileUrl {
                        url: url.to_string(),
                    })?;
                std::fs::read(&path).map_err(|e| FetchError::File { path, source: e })
            }
            "http" | "https" => {
                tracing::debug!(%url, "Fetching over HTTP");
                let response = self
                    .client(url)?
                    .get(url.as_str())
                    .send()
                    .map_err(|e| FetchError::Http {
                        url: url.to_string(),
                        source: e,
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status,
                    });
                }

                let bytes = response.bytes().map_err(|e| FetchError::Http {
                    url: url.to_string(),
                    source: e,
                })?;
                Ok(bytes.to_vec())
            }
            other => Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme: other.to_string(),
            }),
        }
    }
}
