use paa_core::{Credential, KeyValueStore, Result};
use serde::Serialize;
use std::sync::Arc;

pub const CREDENTIAL_KEY: &str = "credential";
pub const KEYWORD_KEY: &str = "keyword";
pub const QUESTIONS_KEY: &str = "questions";
pub const SOURCE1_KEY: &str = "source1";
pub const SOURCE2_KEY: &str = "source2";
pub const ARTICLE_KEY: &str = "article";

/// Everything the form remembers between sessions. Questions are kept as the
/// raw newline-delimited text the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValues {
    #[serde(skip)]
    pub credential: Credential,
    pub keyword: String,
    pub questions_text: String,
    pub source1: String,
    pub source2: String,
}

impl FormValues {
    pub fn sources(&self) -> Vec<String> {
        [&self.source1, &self.source2]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect()
    }
}

pub struct FormStore {
    store: Arc<dyn KeyValueStore>,
}

impl FormStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn get_or_default(&self, key: &str) -> Result<String> {
        Ok(self.store.get(key).await?.unwrap_or_default())
    }

    pub async fn load(&self) -> Result<FormValues> {
        Ok(FormValues {
            credential: Credential::new(self.get_or_default(CREDENTIAL_KEY).await?),
            keyword: self.get_or_default(KEYWORD_KEY).await?,
            questions_text: self.get_or_default(QUESTIONS_KEY).await?,
            source1: self.get_or_default(SOURCE1_KEY).await?,
            source2: self.get_or_default(SOURCE2_KEY).await?,
        })
    }

    /// Persists the article inputs. The credential is saved separately, as soon
    /// as it changes.
    pub async fn save_inputs(&self, values: &FormValues) -> Result<()> {
        self.store.set(KEYWORD_KEY, &values.keyword).await?;
        self.store.set(QUESTIONS_KEY, &values.questions_text).await?;
        self.store.set(SOURCE1_KEY, &values.source1).await?;
        self.store.set(SOURCE2_KEY, &values.source2).await?;
        Ok(())
    }

    pub async fn save_credential(&self, credential: &Credential) -> Result<()> {
        self.store.set(CREDENTIAL_KEY, credential.expose()).await
    }

    /// HTML of the last article, kept so a later session can improve it.
    pub async fn save_article(&self, html: &str) -> Result<()> {
        self.store.set(ARTICLE_KEY, html).await
    }

    pub async fn load_article(&self) -> Result<Option<String>> {
        Ok(self.store.get(ARTICLE_KEY).await?.filter(|html| !html.trim().is_empty()))
    }

    pub async fn clear(&self) -> Result<()> {
        for key in [CREDENTIAL_KEY, KEYWORD_KEY, QUESTIONS_KEY, SOURCE1_KEY, SOURCE2_KEY, ARTICLE_KEY] {
            self.store.remove(key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryStore;

    #[tokio::test]
    async fn test_form_round_trip() {
        let backing = MemoryStore::new();
        let form = FormStore::new(Arc::new(backing.clone()));

        assert_eq!(form.load().await.unwrap(), FormValues::default());

        let values = FormValues {
            credential: Credential::new("sk-test"),
            keyword: "best dentists".to_string(),
            questions_text: "- How much?\n- Where?".to_string(),
            source1: "Clinic A".to_string(),
            source2: String::new(),
        };
        form.save_inputs(&values).await.unwrap();
        assert_eq!(backing.get(CREDENTIAL_KEY).await.unwrap(), None);

        form.save_credential(&values.credential).await.unwrap();
        assert_eq!(form.load_article().await.unwrap(), None);
        form.save_article("<p>kept</p>").await.unwrap();
        assert_eq!(form.load_article().await.unwrap().as_deref(), Some("<p>kept</p>"));
        let loaded = form.load().await.unwrap();
        assert_eq!(loaded, values);
        assert_eq!(loaded.sources(), vec!["Clinic A".to_string()]);

        form.clear().await.unwrap();
        assert!(backing.is_empty().await);
    }
}
