//! reply.rs — category-conditioned reply generation with static fallbacks.
//!
//! Same fail-open contract as the classifier: the caller always gets a
//! non-empty reply. Provider failures (and blank "successes") substitute
//! the fixed per-category fallback sentence.

use tracing::warn;

use crate::category::Category;
use crate::prompts;
use crate::provider::{ChatMessage, CompletionRequest, DynTextProvider};

/// Looser sampling than classification: the reply should read naturally.
const REPLY_TEMPERATURE: f32 = 0.7;
const REPLY_MAX_TOKENS: u32 = 100;

/// Outcome of one reply generation. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// True when the fallback sentence was substituted.
    pub degraded: bool,
}

pub struct ReplyGenerator {
    provider: DynTextProvider,
}

impl ReplyGenerator {
    pub fn new(provider: DynTextProvider) -> Self {
        Self { provider }
    }

    /// Generate a reply for an already-classified comment.
    pub async fn generate(&self, comment: &str, category: Category) -> Reply {
        let req = CompletionRequest {
            messages: vec![
                ChatMessage::system(prompts::SYSTEM_PROMPT),
                ChatMessage::user(prompts::reply_prompt(category, comment)),
            ],
            temperature: REPLY_TEMPERATURE,
            max_tokens: REPLY_MAX_TOKENS,
        };

        match self.provider.complete(&req).await {
            Ok(raw) => {
                let text = raw.trim().to_string();
                if text.is_empty() {
                    // A blank reply is as useless as an error; same path.
                    warn!(category = %category, "provider returned an empty reply, using fallback");
                    Reply {
                        text: prompts::fallback_reply(category).to_string(),
                        degraded: true,
                    }
                } else {
                    Reply {
                        text,
                        degraded: false,
                    }
                }
            }
            Err(err) => {
                warn!(provider = self.provider.name(), category = %category, error = %err, "reply call failed, using fallback");
                Reply {
                    text: prompts::fallback_reply(category).to_string(),
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
    async fn generated_reply_is_trimmed_verbatim() {
        let g = ReplyGenerator::new(Arc::new(MockProvider::new(
            "  Thanks for your interest!  ",
        )));
        let out = g.generate("how do I order?", Category::Lead).await;
        assert_eq!(out.text, "Thanks for your interest!");
        assert!(!out.degraded);
    }

    #[tokio::test]
    async fn failure_substitutes_category_fallback() {
        for cat in Category::ALL {
            let g = ReplyGenerator::new(Arc::new(ScriptedProvider::new(vec![Err(
                ProviderError::Quota,
            )])));
            let out = g.generate("anything", cat).await;
            assert_eq!(out.text, prompts::fallback_reply(cat));
            assert!(out.degraded);
            assert!(!out.text.is_empty());
        }
    }

    #[tokio::test]
    async fn blank_success_substitutes_fallback() {
        let g = ReplyGenerator::new(Arc::new(MockProvider::new("   \n ")));
        let out = g.generate("hi", Category::Praise).await;
        assert_eq!(out.text, prompts::fallback_reply(Category::Praise));
        assert!(out.degraded);
    }
}
