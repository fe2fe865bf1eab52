use std::fmt;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;
use paa_core::error::GENERIC_COMPLETION_ERROR;
use paa_core::{CompletionModel, Credential, Error, Result};
use crate::Config;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

// `error` and `error.message` are both optional on the wire.
#[derive(Deserialize, Default)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiModel {
    client: Client,
    endpoint: String,
    model_name: String,
    temperature: f32,
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::Validation(format!("Invalid base URL {}: {}", config.base_url, e)))?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base.as_str().trim_end_matches('/')),
            model_name: config.model_name.clone(),
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .field("model_name", &self.model_name)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .unwrap_or_default()
        .error
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_COMPLETION_ERROR.to_string())
}

fn status_error(status: StatusCode, body: &str) -> Error {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
        _ => Error::Api { status: status.as_u16(), message },
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Network(format!("request timed out: {}", err))
    } else {
        Error::Network(err.to_string())
    }
}

fn first_content(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("invalid JSON: {}", e)))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| Error::MalformedResponse("missing choices[0].message.content".to_string()))
}

#[async_trait]
impl CompletionModel for OpenAiModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, credential: &Credential, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model_name,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
        };

        debug!(
            endpoint = %self.endpoint,
            model = %self.model_name,
            system_len = system.len(),
            user_len = user.len(),
            "POST chat completion"
        );

        let response = self.client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            warn!(%status, "Chat completion rejected");
            return Err(status_error(status, &body));
        }

        first_content(&body)
    }
}
