use std::sync::Arc;
use paa_core::{CompletionModel, Result};
use tracing::info;
use crate::Config;

pub mod openai;
pub mod scripted;

pub use openai::OpenAiModel;
pub use scripted::ScriptedModel;

pub fn create_model(config: &Config) -> Result<Arc<dyn CompletionModel>> {
    let model = OpenAiModel::new(config)?;
    info!("🧠 Completion model ready: {} at {}", config.model_name, config.base_url);
    Ok(Arc::new(model))
}
