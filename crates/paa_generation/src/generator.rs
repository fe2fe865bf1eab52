use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use paa_core::{ArticleResult, CompletionModel, Credential, Error, GenerationRequest, Result};
use paa_inference::prompts::{build_generation_prompt, build_improvement_prompt};
use tokio::sync::broadcast;
use tracing::{info, warn};
use crate::state::{GenerationState, Notification};

pub const MISSING_CREDENTIAL: &str = "Please enter a valid OpenAI API key";
pub const MISSING_QUESTIONS: &str = "Please add at least one question";
pub const MISSING_SOURCES: &str = "Please add at least one source";
pub const MISSING_KEYWORD: &str = "Please enter a main keyword";
pub const CANCELLED: &str = "The request was cancelled before it finished";

const NOTIFICATION_CAPACITY: usize = 32;

/// Drives the generate/improve workflow for one session.
///
/// Only one operation runs at a time: a call made while another is in flight
/// is rejected with [`Error::Busy`] and leaves the running one alone. The state
/// lock is never held across an await.
pub struct ArticleGenerator {
    model: Arc<dyn CompletionModel>,
    state: Mutex<GenerationState>,
    notifications: broadcast::Sender<Notification>,
}

impl fmt::Debug for ArticleGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleGenerator")
            .field("model", &self.model.name())
            .finish()
    }
}

/// Drops blank questions and sources, then checks what is left in the order
/// credential, questions, sources, keyword.
fn validate(credential: &Credential, request: &mut GenerationRequest) -> Result<()> {
    request.questions.retain(|q| !q.trim().is_empty());
    request.sources.retain(|s| !s.trim().is_empty());

    if credential.is_empty() {
        return Err(Error::Validation(MISSING_CREDENTIAL.to_string()));
    }
    if request.questions.is_empty() {
        return Err(Error::Validation(MISSING_QUESTIONS.to_string()));
    }
    if request.sources.is_empty() {
        return Err(Error::Validation(MISSING_SOURCES.to_string()));
    }
    if request.keyword.trim().is_empty() {
        return Err(Error::Validation(MISSING_KEYWORD.to_string()));
    }
    Ok(())
}

/// Marks an operation as in flight. If the caller's future is dropped before
/// [`InFlight::finish`] runs, the state moves to `Failed` so the session does
/// not stay busy forever.
struct InFlight<'a> {
    generator: &'a ArticleGenerator,
    retained: Option<ArticleResult>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn new(generator: &'a ArticleGenerator, retained: Option<ArticleResult>) -> Self {
        Self { generator, retained, finished: false }
    }

    fn finish(mut self, outcome: Result<ArticleResult>, success: &str) -> Result<ArticleResult> {
        self.finished = true;
        let retained = self.retained.take();
        self.generator.settle(outcome, retained, success)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!("🛑 Operation dropped before the model answered");
        *self.generator.lock_state() = GenerationState::Failed {
            message: CANCELLED.to_string(),
            retained: self.retained.take(),
        };
        self.generator.notify(Notification::error(CANCELLED));
    }
}

impl ArticleGenerator {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            model,
            state: Mutex::new(GenerationState::Idle),
            notifications,
        }
    }

    // Every write leaves a whole value behind, so a poisoned lock is still usable.
    fn lock_state(&self) -> MutexGuard<'_, GenerationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn state(&self) -> GenerationState {
        self.lock_state().clone()
    }

    pub async fn current_article(&self) -> Option<ArticleResult> {
        self.lock_state().article().cloned()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Puts a previously produced article on screen, e.g. one saved by an
    /// earlier session, so it can be improved.
    pub async fn restore(&self, article: ArticleResult) -> Result<()> {
        let mut state = self.lock_state();
        if state.is_busy() {
            return Err(self.reject_busy(&state));
        }
        *state = GenerationState::Ready { article };
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        // No receivers is fine, the state still carries the outcome.
        let _ = self.notifications.send(notification);
    }

    fn reject_busy(&self, current: &GenerationState) -> Error {
        warn!("⏳ Rejecting request while {}", current.name());
        let err = Error::Busy;
        self.notify(Notification::error(err.user_message()));
        err
    }

    /// Validates and moves to `Generating`, or records why it could not.
    fn begin_generation(&self, credential: &Credential, request: &mut GenerationRequest) -> Result<InFlight<'_>> {
        let mut state = self.lock_state();
        if state.is_busy() {
            return Err(self.reject_busy(&state));
        }
        let retained = state.article().cloned();

        if let Err(err) = validate(credential, request) {
            warn!("🚫 Generation refused: {}", err);
            *state = GenerationState::Failed {
                message: err.user_message(),
                retained,
            };
            self.notify(Notification::error(err.user_message()));
            return Err(err);
        }

        *state = GenerationState::Generating { retained: retained.clone() };
        Ok(InFlight::new(self, retained))
    }

    pub async fn generate(&self, credential: &Credential, mut request: GenerationRequest) -> Result<ArticleResult> {
        let in_flight = self.begin_generation(credential, &mut request)?;

        info!(
            "✍️ Generating {} article for \"{}\" ({} questions, {} sources)",
            request.variant,
            request.keyword.trim(),
            request.questions.len(),
            request.sources.len()
        );
        let prompt = build_generation_prompt(&request);
        let outcome = self
            .model
            .complete(credential, &prompt.system, &prompt.user)
            .await
            .map(ArticleResult::from_html);

        in_flight.finish(outcome, "Article generated successfully")
    }

    /// Checks there is an article and a key, then moves to `Improving`.
    fn begin_improvement(&self, credential: &Credential) -> Result<(InFlight<'_>, ArticleResult)> {
        let mut state = self.lock_state();
        if state.is_busy() {
            return Err(self.reject_busy(&state));
        }

        let Some(current) = state.article().cloned() else {
            let err = Error::NothingToImprove;
            warn!("🚫 Improvement refused: {}", err);
            *state = GenerationState::Failed {
                message: err.user_message(),
                retained: None,
            };
            self.notify(Notification::error(err.user_message()));
            return Err(err);
        };

        if credential.is_empty() {
            let err = Error::Validation(MISSING_CREDENTIAL.to_string());
            warn!("🚫 Improvement refused: {}", err);
            *state = GenerationState::Failed {
                message: err.user_message(),
                retained: Some(current),
            };
            self.notify(Notification::error(err.user_message()));
            return Err(err);
        }

        *state = GenerationState::Improving { article: current.clone() };
        Ok((InFlight::new(self, Some(current.clone())), current))
    }

    pub async fn improve(&self, credential: &Credential, keyword: &str) -> Result<ArticleResult> {
        let (in_flight, current) = self.begin_improvement(credential)?;

        info!("🔧 Improving article for \"{}\" ({} words)", keyword.trim(), current.word_count);
        let prompt = build_improvement_prompt(&current.html, keyword);
        let outcome = self
            .model
            .complete(credential, &prompt.system, &prompt.user)
            .await
            .map(ArticleResult::from_html);

        in_flight.finish(outcome, "Article improved successfully")
    }

    fn settle(
        &self,
        outcome: Result<ArticleResult>,
        retained: Option<ArticleResult>,
        success: &str,
    ) -> Result<ArticleResult> {
        let mut state = self.lock_state();
        match outcome {
            Ok(article) => {
                info!("✨ {} ({} words, {} min read)", success, article.word_count, article.reading_time);
                *state = GenerationState::Ready { article: article.clone() };
                self.notify(Notification::success(success));
                Ok(article)
            }
            Err(err) => {
                warn!("❌ Completion failed: {}", err);
                *state = GenerationState::Failed {
                    message: err.user_message(),
                    retained,
                };
                self.notify(Notification::error(err.user_message()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NotificationKind;
    use paa_core::ArticleVariant;
    use paa_inference::models::ScriptedModel;
    use tokio::sync::Notify;

    const ARTICLE: &str = "<h3>What does it cost?</h3><p>one two three</p>";

    fn request() -> GenerationRequest {
        GenerationRequest {
            keyword: "root canal".to_string(),
            questions: vec!["What does it cost?".to_string()],
            sources: vec!["Clinic A charges 100.".to_string()],
            variant: ArticleVariant::Informational,
        }
    }

    fn key() -> Credential {
        Credential::new("sk-test")
    }

    fn setup(model: ScriptedModel) -> (Arc<ScriptedModel>, ArticleGenerator) {
        let model = Arc::new(model);
        let generator = ArticleGenerator::new(model.clone());
        (model, generator)
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (model, generator) = setup(ScriptedModel::new(ARTICLE));
        let mut notifications = generator.subscribe();

        let article = generator.generate(&key(), request()).await.unwrap();
        assert_eq!(article.word_count, 7);
        assert_eq!(article.reading_time, 1);
        assert_eq!(generator.state().await, GenerationState::Ready { article: article.clone() });
        assert_eq!(model.calls(), 1);

        let note = notifications.recv().await.unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn test_generate_without_sources_never_calls_model() {
        let (model, generator) = setup(ScriptedModel::new(ARTICLE));
        let mut req = request();
        req.sources = vec![String::new(), "  ".to_string()];

        let err = generator.generate(&key(), req).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == MISSING_SOURCES));
        assert_eq!(model.calls(), 0);
        assert!(matches!(generator.state().await, GenerationState::Failed { ref message, retained: None } if message == MISSING_SOURCES));
    }

    #[tokio::test]
    async fn test_validation_order() {
        let (model, generator) = setup(ScriptedModel::new(ARTICLE));
        let empty = GenerationRequest {
            keyword: " ".to_string(),
            questions: vec![],
            sources: vec![],
            variant: ArticleVariant::Directory,
        };

        let err = generator.generate(&Credential::new(""), empty.clone()).await.unwrap_err();
        assert_eq!(err.user_message(), MISSING_CREDENTIAL);

        let err = generator.generate(&key(), empty.clone()).await.unwrap_err();
        assert_eq!(err.user_message(), MISSING_QUESTIONS);

        let mut req = empty.clone();
        req.questions = vec!["q".to_string()];
        let err = generator.generate(&key(), req.clone()).await.unwrap_err();
        assert_eq!(err.user_message(), MISSING_SOURCES);

        req.sources = vec!["s".to_string()];
        let err = generator.generate(&key(), req).await.unwrap_err();
        assert_eq!(err.user_message(), MISSING_KEYWORD);

        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_improve_without_article() {
        let (model, generator) = setup(ScriptedModel::new(ARTICLE));
        let mut notifications = generator.subscribe();

        let err = generator.improve(&key(), "root canal").await.unwrap_err();
        assert!(matches!(err, Error::NothingToImprove));
        assert_eq!(model.calls(), 0);
        assert_eq!(generator.state().await.error(), Some(err.user_message().as_str()));

        let note = notifications.recv().await.unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert!(note.message.contains("nothing to improve"));
    }

    #[tokio::test]
    async fn test_improve_replaces_article() {
        let (model, generator) = setup(
            ScriptedModel::new(ARTICLE).with_reply(Ok(ARTICLE.to_string())),
        );
        generator.generate(&key(), request()).await.unwrap();
        model.push_reply(Ok("<h3>Cost</h3><p>one two three four</p><table></table>".to_string()));

        let improved = generator.improve(&key(), "root canal").await.unwrap();
        assert_eq!(improved.word_count, 5);
        assert_eq!(generator.current_article().await, Some(improved));

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].1.contains(ARTICLE));
    }

    #[tokio::test]
    async fn test_failed_improve_keeps_last_article() {
        let (model, generator) = setup(ScriptedModel::new(ARTICLE));
        let original = generator.generate(&key(), request()).await.unwrap();
        model.push_reply(Err(Error::Api { status: 503, message: "overloaded".to_string() }));
        let mut notifications = generator.subscribe();

        let err = generator.improve(&key(), "root canal").await.unwrap_err();
        assert_eq!(err.user_message(), "overloaded");
        assert_eq!(
            generator.state().await,
            GenerationState::Failed { message: "overloaded".to_string(), retained: Some(original.clone()) }
        );
        assert_eq!(generator.current_article().await, Some(original));
        assert_eq!(notifications.recv().await.unwrap(), Notification::error("overloaded"));

        // The retained article can still be improved.
        assert!(generator.improve(&key(), "root canal").await.is_ok());
    }

    #[tokio::test]
    async fn test_improve_without_credential_keeps_article() {
        let (model, generator) = setup(ScriptedModel::new(ARTICLE));
        let original = generator.generate(&key(), request()).await.unwrap();

        let err = generator.improve(&Credential::new(""), "root canal").await.unwrap_err();
        assert_eq!(err.user_message(), MISSING_CREDENTIAL);
        assert_eq!(generator.current_article().await, Some(original));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_message_reaches_state() {
        let (_model, generator) = setup(
            ScriptedModel::new(ARTICLE)
                .with_reply(Err(Error::Api { status: 429, message: "rate limited".to_string() })),
        );

        let err = generator.generate(&key(), request()).await.unwrap_err();
        assert_eq!(err.user_message(), "rate limited");
        assert_eq!(generator.state().await.error(), Some("rate limited"));
    }

    #[tokio::test]
    async fn test_failed_regeneration_keeps_previous_article() {
        let (model, generator) = setup(ScriptedModel::new(ARTICLE));
        let original = generator.generate(&key(), request()).await.unwrap();
        model.push_reply(Err(Error::Network("connection reset".to_string())));

        assert!(generator.generate(&key(), request()).await.is_err());
        assert_eq!(generator.current_article().await, Some(original));
    }

    #[tokio::test]
    async fn test_restored_article_can_be_improved() {
        let (model, generator) = setup(ScriptedModel::new("<p>better</p>"));
        generator.restore(ArticleResult::from_html(ARTICLE)).await.unwrap();

        let improved = generator.improve(&key(), "root canal").await.unwrap();
        assert_eq!(improved.html, "<p>better</p>");
        assert!(model.prompts()[0].1.contains(ARTICLE));
    }

    #[tokio::test]
    async fn test_concurrent_call_is_rejected() {
        let gate = Arc::new(Notify::new());
        let model = Arc::new(ScriptedModel::new(ARTICLE).with_gate(gate.clone()));
        let generator = Arc::new(ArticleGenerator::new(model.clone()));

        let first = {
            let generator = generator.clone();
            tokio::spawn(async move { generator.generate(&key(), request()).await })
        };
        while model.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(generator.state().await.is_busy());

        let err = generator.generate(&key(), request()).await.unwrap_err();
        assert!(matches!(err, Error::Busy));
        let err = generator.improve(&key(), "root canal").await.unwrap_err();
        assert!(matches!(err, Error::Busy));
        assert!(matches!(generator.state().await, GenerationState::Generating { .. }));

        gate.notify_one();
        let article = first.await.unwrap().unwrap();
        assert_eq!(generator.current_article().await, Some(article));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_dropped_generate_frees_the_session() {
        let gate = Arc::new(Notify::new());
        let model = Arc::new(ScriptedModel::new(ARTICLE).with_gate(gate.clone()));
        let generator = Arc::new(ArticleGenerator::new(model.clone()));
        gate.notify_one();
        let first = generator.generate(&key(), request()).await.unwrap();
        let mut notifications = generator.subscribe();

        let task = {
            let generator = generator.clone();
            tokio::spawn(async move { generator.generate(&key(), request()).await })
        };
        while model.calls() < 2 {
            tokio::task::yield_now().await;
        }
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert_eq!(
            generator.state().await,
            GenerationState::Failed { message: CANCELLED.to_string(), retained: Some(first.clone()) }
        );
        assert_eq!(notifications.recv().await.unwrap(), Notification::error(CANCELLED));

        gate.notify_one();
        let article = generator.generate(&key(), request()).await.unwrap();
        assert_eq!(generator.state().await, GenerationState::Ready { article });
        assert_eq!(model.calls(), 3);
    }

    #[tokio::test]
    async fn test_dropped_improve_keeps_article() {
        let gate = Arc::new(Notify::new());
        let model = Arc::new(ScriptedModel::new("<p>better</p>").with_gate(gate.clone()));
        let generator = Arc::new(ArticleGenerator::new(model.clone()));
        let original = ArticleResult::from_html(ARTICLE);
        generator.restore(original.clone()).await.unwrap();

        let task = {
            let generator = generator.clone();
            tokio::spawn(async move { generator.improve(&key(), "root canal").await })
        };
        while model.calls() == 0 {
            tokio::task::yield_now().await;
        }
        task.abort();
        let _ = task.await;

        assert_eq!(generator.state().await.error(), Some(CANCELLED));
        assert_eq!(generator.current_article().await, Some(original));
        assert!(generator.restore(ArticleResult::from_html(ARTICLE)).await.is_ok());
    }
}
