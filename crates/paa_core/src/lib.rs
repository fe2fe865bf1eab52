pub mod error;
pub mod metrics;
pub mod models;
pub mod questions;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use metrics::{derive_metrics, ArticleMetrics};
pub use models::CompletionModel;
pub use questions::{join_questions, parse_questions};
pub use storage::{ArticleExporter, KeyValueStore};
pub use types::{check_source_count, ArticleResult, ArticleVariant, Credential, GenerationRequest, MAX_SOURCES};
