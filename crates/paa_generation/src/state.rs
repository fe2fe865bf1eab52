use paa_core::ArticleResult;
use serde::Serialize;

/// Where the article workflow is. In-flight and failed states keep the last
/// good article so it stays on screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationState {
    #[default]
    Idle,
    Generating { retained: Option<ArticleResult> },
    Improving { article: ArticleResult },
    Ready { article: ArticleResult },
    Failed { message: String, retained: Option<ArticleResult> },
}

impl GenerationState {
    /// The article the presentation layer should display.
    pub fn article(&self) -> Option<&ArticleResult> {
        match self {
            GenerationState::Idle => None,
            GenerationState::Generating { retained } | GenerationState::Failed { retained, .. } => retained.as_ref(),
            GenerationState::Improving { article } | GenerationState::Ready { article } => Some(article),
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, GenerationState::Generating { .. } | GenerationState::Improving { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::Generating { .. } => "generating",
            GenerationState::Improving { .. } => "improving",
            GenerationState::Ready { .. } => "ready",
            GenerationState::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message for the user, one per finished operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Error, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_keeps_article_visible() {
        let article = ArticleResult::from_html("<p>kept</p>");
        let state = GenerationState::Failed {
            message: "rate limited".to_string(),
            retained: Some(article.clone()),
        };
        assert_eq!(state.article(), Some(&article));
        assert_eq!(state.error(), Some("rate limited"));
        assert!(!state.is_busy());
    }

    #[test]
    fn test_state_serialization() {
        let state = GenerationState::Ready { article: ArticleResult::from_html("<p>a b</p>") };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["article"]["word_count"], 2);

        let json = serde_json::to_value(GenerationState::Idle).unwrap();
        assert_eq!(json["status"], "idle");
    }
}
