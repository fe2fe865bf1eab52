use async_trait::async_trait;
use std::fmt;
use crate::types::Credential;
use crate::Result;

#[async_trait]
pub trait CompletionModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Run one system + user exchange and return the trimmed assistant text.
    async fn complete(&self, credential: &Credential, system: &str, user: &str) -> Result<String>;
}
