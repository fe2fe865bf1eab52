use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::metrics::derive_metrics;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleVariant {
    /// Q&A article, one section per question.
    #[default]
    Informational,
    /// Listing of businesses or professionals taken from the sources.
    Directory,
}

impl fmt::Display for ArticleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleVariant::Informational => write!(f, "informational"),
            ArticleVariant::Directory => write!(f, "directory"),
        }
    }
}

impl FromStr for ArticleVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "informational" | "info" => Ok(ArticleVariant::Informational),
            "directory" | "dir" => Ok(ArticleVariant::Directory),
            other => Err(format!("Unknown article variant: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub keyword: String,
    pub questions: Vec<String>,
    pub sources: Vec<String>,
    #[serde(default)]
    pub variant: ArticleVariant,
}

/// The form offers two source fields.
pub const MAX_SOURCES: usize = 2;

/// Rejects more than [`MAX_SOURCES`] sources.
pub fn check_source_count(count: usize) -> Result<()> {
    if count > MAX_SOURCES {
        return Err(Error::Validation(format!("At most {} sources are supported", MAX_SOURCES)));
    }
    Ok(())
}

impl GenerationRequest {
    /// Sources with blank entries dropped, in their original order.
    pub fn non_empty_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// API key for the completion endpoint. Opaque, never logged.
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleResult {
    pub html: String,
    pub word_count: usize,
    pub reading_time: usize,
}

impl ArticleResult {
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        let metrics = derive_metrics(&html);
        Self {
            html,
            word_count: metrics.word_count,
            reading_time: metrics.reading_time,
        }
    }
}
