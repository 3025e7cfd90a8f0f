//! provider.rs — text-generation collaborator boundary.
//!
//! The core only depends on a minimal request/response shape: role-tagged
//! messages in, generated text (or a typed failure) out. The concrete
//! OpenAI client, the deterministic mock and the scripted fault-injection
//! provider all sit behind the same trait so callers and tests are wired
//! identically.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::provider::ProviderConfig;

/// Failure taxonomy for provider calls. Every variant is recovered locally
/// by the classifier/reply generator; none of them escapes the pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected (status {0})")]
    Auth(u16),

    #[error("quota exceeded")]
    Quota,

    #[error("provider returned status {0}")]
    Api(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("missing API key")]
    MissingApiKey,
}

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Minimal completion request: messages plus the two sampling knobs the
/// pipeline actually varies (low temperature/short cap for classification,
/// higher/longer for replies).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait object used by the pipeline and tests.
pub trait TextProvider: Send + Sync {
    /// Run one completion and return the generated text.
    fn complete<'a>(
        &'a self,
        req: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynTextProvider = Arc<dyn TextProvider>;

/// Factory: build a provider according to config and environment.
///
/// * If `AI_TEST_MODE=mock`, returns a deterministic mock provider.
/// * Else builds the real OpenAI client from config.
pub fn build_provider(config: &ProviderConfig) -> DynTextProvider {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockProvider::new("QUESTION"));
    }

    Arc::new(OpenAiProvider::from_config(config))
}

// ------------------------------------------------------------
// OpenAI provider
// ------------------------------------------------------------

/// OpenAI provider (Chat Completions API). Requires an API key, either
/// resolved by config or via `OPENAI_API_KEY`.
pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("comment-autopilot/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model: model.into(),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.api_key.clone(), config.model.clone())
    }
}

impl TextProvider for OpenAiProvider {
    fn complete<'a>(
        &'a self,
        req: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        Box::pin(async move {
            if self.api_key.is_empty() {
                return Err(ProviderError::MissingApiKey);
            }

            #[derive(Serialize)]
            struct Req<'a> {
                model: &'a str,
                messages: &'a [ChatMessage],
                temperature: f32,
                max_tokens: u32,
            }
            #[derive(Deserialize)]
            struct Resp {
                choices: Vec<Choice>,
            }
            #[derive(Deserialize)]
            struct Choice {
                message: ChoiceMsg,
            }
            #[derive(Deserialize)]
            struct ChoiceMsg {
                content: String,
            }

            let body = Req {
                model: &self.model,
                messages: &req.messages,
                temperature: req.temperature,
                max_tokens: req.max_tokens,
            };

            let resp = self
                .http
                .post("https://api.openai.com/v1/chat/completions")
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(match status.as_u16() {
                    401 | 403 => ProviderError::Auth(status.as_u16()),
                    429 => ProviderError::Quota,
                    code => ProviderError::Api(code),
                });
            }

            let parsed: Resp = resp
                .json()
                .await
                .map_err(|e| ProviderError::Malformed(e.to_string()))?;

            let content = parsed
                .choices
                .first()
                .map(|c| c.message.content.trim().to_string())
                .ok_or_else(|| ProviderError::Malformed("empty choices".into()))?;

            Ok(content)
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ------------------------------------------------------------
// Test providers
// ------------------------------------------------------------

/// Deterministic provider that answers every request with a fixed string.
#[derive(Clone)]
pub struct MockProvider {
    fixed: String,
}

impl MockProvider {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self { fixed: fixed.into() }
    }
}

impl TextProvider for MockProvider {
    fn complete<'a>(
        &'a self,
        _req: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { Ok(out) })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Fault-injection provider: pops one scripted response per call, in order.
/// Once the script runs out it keeps returning a network error, so a test
/// that under-scripts fails loudly instead of silently succeeding.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

impl TextProvider for ScriptedProvider {
    fn complete<'a>(
        &'a self,
        _req: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        let next = self
            .script
            .lock()
            .expect("poisoned script")
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("script exhausted".into())));
        Box::pin(async move { next })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
