use std::sync::Arc;
use paa_core::{ArticleExporter, Credential};
use paa_generation::ArticleGenerator;

pub struct AppState {
    pub generator: Arc<ArticleGenerator>,
    /// Used when a request does not carry its own `api_key`.
    pub default_credential: Option<Credential>,
    pub exporter: Option<Arc<dyn ArticleExporter>>,
}

impl AppState {
    pub fn new(generator: Arc<ArticleGenerator>) -> Self {
        Self {
            generator,
            default_credential: None,
            exporter: None,
        }
    }

    pub fn with_default_credential(mut self, credential: Option<Credential>) -> Self {
        self.default_credential = credential.filter(|c| !c.is_empty());
        self
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn ArticleExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn credential_for(&self, supplied: Option<Credential>) -> Credential {
        supplied
            .filter(|c| !c.is_empty())
            .or_else(|| self.default_credential.clone())
            .unwrap_or_default()
    }
}
