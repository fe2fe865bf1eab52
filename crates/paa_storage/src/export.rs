use async_trait::async_trait;
use chrono::Utc;
use paa_core::{ArticleExporter, Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use crate::pdf::render_pdf;

pub const FILE_PREFIX: &str = "seo-article";
pub const HTML_EXTENSION: &str = "html";
pub const PDF_EXTENSION: &str = "pdf";
const PDF_TITLE: &str = "SEO article";

/// Writes articles as `seo-article-<unix millis>.<ext>` files.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(millis: i64, extension: &str) -> String {
        format!("{}-{}.{}", FILE_PREFIX, millis, extension)
    }

    async fn write(&self, extension: &str, contents: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Storage(format!("Failed to create output directory {}: {}", self.dir.display(), e))
        })?;

        let path = self.dir.join(Self::file_name(Utc::now().timestamp_millis(), extension));
        tokio::fs::write(&path, contents).await?;
        info!("💾 Article saved to {}", path.display());
        Ok(path)
    }
}

#[async_trait]
impl ArticleExporter for FileExporter {
    async fn export_html(&self, html: &str) -> Result<PathBuf> {
        self.write(HTML_EXTENSION, html.as_bytes()).await
    }

    async fn export_pdf(&self, html: &str) -> Result<PathBuf> {
        let bytes = render_pdf(PDF_TITLE, html)?;
        self.write(PDF_EXTENSION, &bytes).await
    }
}
