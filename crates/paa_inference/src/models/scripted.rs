use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use paa_core::{CompletionModel, Credential, Result};
use tokio::sync::Notify;

/// Replays queued replies instead of calling a remote endpoint.
///
/// Used as the test double for everything above the HTTP client: it counts
/// calls, records the prompts it was given and can be held mid-request.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    fallback: String,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl fmt::Debug for ScriptedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedModel")
            .field("calls", &self.calls())
            .finish()
    }
}

impl ScriptedModel {
    /// Answers every call with `fallback` unless a queued reply is pending.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
            gate: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(self, reply: Result<String>) -> Self {
        self.push_reply(reply);
        self
    }

    /// Each call waits for one `notify_one` on `gate` before answering.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push_reply(&self, reply: Result<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(system, user)` pairs in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn complete(&self, _credential: &Credential, system: &str, user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((system.to_string(), user.to_string()));
        }

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let queued = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match queued {
            Some(reply) => reply.map(|text| text.trim().to_string()),
            None => Ok(self.fallback.trim().to_string()),
        }
    }
}
