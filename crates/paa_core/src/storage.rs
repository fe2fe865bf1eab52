use async_trait::async_trait;
use std::path::PathBuf;
use crate::Result;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a named value, `None` when it was never set
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a named value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Forget a named value
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
pub trait ArticleExporter: Send + Sync {
    /// Save an article as a standalone HTML file and return where it went
    async fn export_html(&self, html: &str) -> Result<PathBuf>;

    /// Render an article's text into a PDF file and return where it went
    async fn export_pdf(&self, html: &str) -> Result<PathBuf>;
}
