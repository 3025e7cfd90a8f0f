//! pipeline.rs — classify-then-reply composition with batch support.
//!
//! `process` is infallible by construction (both sub-steps fail open), so
//! `process_batch` gets per-item isolation for free; the loop itself adds
//! no early-abort path.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::classify::Classifier;
use crate::provider::DynTextProvider;
use crate::reply::ReplyGenerator;

/// One processed comment. Constructed once, read, discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResult {
    pub comment: String,
    pub category: Category,
    pub reply: String,
    /// True when either sub-step ran on its fallback path.
    pub degraded: bool,
}

pub struct CommentProcessor {
    classifier: Classifier,
    replies: ReplyGenerator,
}

impl CommentProcessor {
    pub fn new(provider: DynTextProvider) -> Self {
        Self {
            classifier: Classifier::new(provider.clone()),
            replies: ReplyGenerator::new(provider),
        }
    }

    /// Classify a comment, then generate a category-appropriate reply.
    pub async fn process(&self, comment: &str) -> CommentResult {
        let classification = self.classifier.classify(comment).await;
        let reply = self.replies.generate(comment, classification.category).await;

        CommentResult {
            comment: comment.to_string(),
            category: classification.category,
            reply: reply.text,
            degraded: classification.degraded || reply.degraded,
        }
    }

    /// Process comments independently, preserving input order.
    pub async fn process_batch(&self, comments: &[String]) -> Vec<CommentResult> {
        let mut results = Vec::with_capacity(comments.len());
        for comment in comments {
            results.push(self.process(comment).await);
        }
        results
    }
}
