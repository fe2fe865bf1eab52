use paa_core::{Error, KeyValueStore, Result};
use std::path::Path;
use std::sync::Arc;

pub mod backends;
pub mod export;
pub mod form;
pub mod pdf;

pub use backends::*;
pub use export::FileExporter;
pub use form::{FormStore, FormValues};

/// Builds a store by name: `memory`, or `file` backed by `path`.
pub async fn create_store(kind: &str, path: Option<&Path>) -> Result<Arc<dyn KeyValueStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "file" => {
            let path = path.ok_or_else(|| Error::Storage("The file store needs a path".to_string()))?;
            Ok(Arc::new(FileStore::open(path).await?))
        }
        other => Err(Error::Storage(format!("Unknown store backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_store, FileExporter, FormStore, FormValues};
}
