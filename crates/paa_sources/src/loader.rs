use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use futures::future::join_all;
use paa_core::{Error, Result};
use reqwest::Client;
use tracing::info;
use url::Url;
use crate::extract::extract_page_text;

/// Where a source text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Text(String),
    File(PathBuf),
    Url(Url),
}

impl FromStr for SourceSpec {
    type Err = String;

    /// `@path` reads a file, `http(s)://...` fetches a page, anything else is
    /// the source text itself.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix('@') {
            if path.trim().is_empty() {
                return Err("Missing file path after '@'".to_string());
            }
            return Ok(SourceSpec::File(PathBuf::from(path)));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Url::parse(s)
                .map(SourceSpec::Url)
                .map_err(|e| format!("Invalid source URL {}: {}", s, e));
        }
        Ok(SourceSpec::Text(s.to_string()))
    }
}

pub struct SourceLoader {
    client: Client,
}

impl SourceLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Source(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub async fn load(&self, spec: &SourceSpec) -> Result<String> {
        match spec {
            SourceSpec::Text(text) => Ok(text.clone()),
            SourceSpec::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::Source(format!("Failed to read {}: {}", path.display(), e))),
            SourceSpec::Url(url) => self.fetch(url).await,
        }
    }

    /// Loads every spec concurrently, keeping their order.
    pub async fn load_all(&self, specs: &[SourceSpec]) -> Result<Vec<String>> {
        join_all(specs.iter().map(|spec| self.load(spec)))
            .await
            .into_iter()
            .collect()
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        info!("🌐 Fetching source {}", url);
        let response = self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Source(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Source(format!("Failed to fetch {}: HTTP {}", url, status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Error::Source(format!("Failed to read {}: {}", url, e)))?;
        let text = extract_page_text(&html)?;
        info!("📄 Extracted {} characters from {}", text.len(), url);
        Ok(text)
    }
}
