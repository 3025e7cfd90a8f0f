//! classify.rs — comment classification with validation and safe default.
//!
//! Classification never fails from the caller's point of view: invalid
//! provider output and provider errors both resolve to `Question`. The
//! `degraded` flag keeps "provider succeeded" vs "defaulted" visible to
//! telemetry without leaking errors.

use tracing::warn;

use crate::category::Category;
use crate::prompts;
use crate::provider::{ChatMessage, CompletionRequest, DynTextProvider};

/// Kept deliberately tight: the answer is a single taxonomy token.
const CLASSIFY_TEMPERATURE: f32 = 0.3;
const CLASSIFY_MAX_TOKENS: u32 = 10;

/// Outcome of one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    /// True when the provider failed or returned an out-of-set token and we
    /// defaulted to `Question`.
    pub degraded: bool,
}

pub struct Classifier {
    provider: DynTextProvider,
}

impl Classifier {
    pub fn new(provider: DynTextProvider) -> Self {
        Self { provider }
    }

    /// Classify a comment into exactly one `Category`.
    ///
    /// Fail-open policy: any provider failure or unrecognized token maps to
    /// `Question`, the most neutral category.
    pub async fn classify(&self, comment: &str) -> Classification {
        let req = CompletionRequest {
            messages: vec![
                ChatMessage::system(prompts::SYSTEM_PROMPT),
                ChatMessage::user(prompts::classification_prompt(comment)),
            ],
            temperature: CLASSIFY_TEMPERATURE,
            max_tokens: CLASSIFY_MAX_TOKENS,
        };

        match self.provider.complete(&req).await {
            Ok(raw) => match Category::parse(&raw) {
                Some(category) => Classification {
                    category,
                    degraded: false,
                },
                None => {
                    warn!(raw = %raw.trim(), "classifier returned out-of-set token, defaulting to QUESTION");
                    Classification {
                        category: Category::Question,
                        degraded: true,
                    }
                }
            },
            Err(err) => {
                warn!(provider = self.provider.name(), error = %err, "classification call failed, defaulting to QUESTION");
                Classification {
                    category: Category::Question,
                    degraded: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::provider::{MockProvider, ProviderError, ScriptedProvider};

    #[tokio::test]
    async fn valid_token_passes_through() {
        let c = Classifier::new(Arc::new(MockProvider::new("LEAD")));
        let out = c.classify("how do I order?").await;
        assert_eq!(out.category, Category::Lead);
        assert!(!out.degraded);
    }

    #[tokio::test]
    async fn lowercase_and_whitespace_normalize() {
        let c = Classifier::new(Arc::new(MockProvider::new("  praise \n")));
        let out = c.classify("love it").await;
        assert_eq!(out.category, Category::Praise);
        assert!(!out.degraded);
    }

    #[tokio::test]
    async fn chatty_answer_defaults_to_question() {
        let c = Classifier::new(Arc::new(MockProvider::new(
            "This is clearly a LEAD comment.",
        )));
        let out = c.classify("how do I order?").await;
        assert_eq!(out.category, Category::Question);
        assert!(out.degraded);
    }

    #[tokio::test]
    async fn provider_failure_defaults_to_question() {
        let c = Classifier::new(Arc::new(ScriptedProvider::new(vec![Err(
            ProviderError::Network("connection reset".into()),
        )])));
        let out = c.classify("anything").await;
        assert_eq!(out.category, Category::Question);
        assert!(out.degraded);
    }
}
