use thiserror::Error;

/// Shown when the completion endpoint fails without an `error.message` payload.
pub const GENERIC_COMPLETION_ERROR: &str = "error while generating the article";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("nothing to improve: generate an article first")]
    NothingToImprove,

    #[error("an article operation is already in progress")]
    Busy,

    #[error("{0}")]
    Auth(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Source error: {0}")]
    Source(String),

    /// Failures at the edges that carry their own context chain.
    #[error("{0:#}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Text for the end user. Remote messages pass through untouched.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NothingToImprove)
    }

    /// Failures that came back from the completion endpoint or the wire.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Auth(_) | Error::Api { .. } | Error::Network(_) | Error::MalformedResponse(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_messages_are_verbatim() {
        let err = Error::Api { status: 429, message: "rate limited".to_string() };
        assert_eq!(err.user_message(), "rate limited");
        assert!(err.is_upstream());

        let err = Error::Auth("Incorrect API key provided".to_string());
        assert_eq!(err.user_message(), "Incorrect API key provided");
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::Validation("keyword".to_string()).is_validation());
        assert!(Error::NothingToImprove.is_validation());
        assert!(!Error::Busy.is_validation());
        assert!(Error::NothingToImprove.user_message().contains("nothing to improve"));
    }

    #[test]
    fn test_external_keeps_context_chain() {
        let err: Error = anyhow::anyhow!("file not found")
            .context("Failed to read questions.txt")
            .into();
        assert_eq!(err.user_message(), "Failed to read questions.txt: file not found");
        assert!(!err.is_upstream());
    }
}
