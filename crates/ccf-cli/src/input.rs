//! Where a batch of records is read from.

use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// `http://` or `https://`.
    Remote(Url),
    /// Local file, given as a path or a `file://` URL.
    File(PathBuf),
}

impl InputSource {
    /// Classify a command-line value. Anything that is not an absolute URL is
    /// taken as a local path.
    pub fn parse(raw: &str) -> Result<Self> {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(InputSource::Remote(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(InputSource::File)
                .map_err(|()| anyhow!("`{raw}` is not a usable file URL")),
            Ok(url) if url.scheme().len() > 1 => {
                Err(anyhow!("unsupported URL scheme `{}` in `{raw}`", url.scheme()))
            }
            // Not a URL, or a Windows drive letter parsed as a scheme.
            _ => Ok(InputSource::File(PathBuf::from(raw))),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Remote(url) => write!(f, "{url}"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches and decodes JSON inputs; one HTTP client for the whole run.
pub struct Loader {
    client: reqwest::blocking::Client,
}

impl Loader {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;
        Ok(Self { client })
    }

    pub fn load(&self, source: &InputSource) -> Result<serde_json::Value> {
        match source {
            InputSource::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .map_err(|e| anyhow!("failed to fetch {url}: {e}"))?
                    .error_for_status()
                    .map_err(|e| anyhow!("failed to fetch {url}: {e}"))?;
                response
                    .json()
                    .map_err(|e| anyhow!("{url} did not return JSON: {e}"))
            }
            InputSource::File(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("{} is not valid JSON", path.display()))
            }
        }
    }
}
