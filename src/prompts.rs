//! prompts.rs — fixed instruction templates and static fallback replies.
//!
//! All provider-facing wording lives here so product can tune it in one
//! place without touching the pipeline.

use crate::category::Category;

/// System instruction sent with every provider call.
pub const SYSTEM_PROMPT: &str = "You are a social media manager for a business. \
You classify incoming comments and write short, friendly, professional replies. \
Keep replies under two sentences and never make promises about pricing or delivery dates.";

/// Classification instruction: ask for exactly one taxonomy token.
pub fn classification_prompt(comment: &str) -> String {
    format!(
        "Classify the following social media comment into exactly one category.\n\
         Respond with ONLY one word: LEAD, PRAISE, SPAM, QUESTION, or COMPLAINT.\n\n\
         LEAD: shows buying interest or asks how to purchase\n\
         PRAISE: compliments the product, service, or brand\n\
         SPAM: promotional junk, scams, or irrelevant links\n\
         QUESTION: asks for information (hours, sizing, shipping, ...)\n\
         COMPLAINT: reports a problem or expresses dissatisfaction\n\n\
         Comment: {comment}"
    )
}

/// Reply instruction for a comment already classified.
pub fn reply_prompt(category: Category, comment: &str) -> String {
    match category {
        Category::Lead => format!(
            "A potential customer left this comment: \"{comment}\"\n\
             Write a short, enthusiastic reply that thanks them and invites them \
             to send a direct message to complete their order."
        ),
        Category::Praise => format!(
            "A happy customer left this comment: \"{comment}\"\n\
             Write a short, warm reply thanking them for their support."
        ),
        Category::Spam => format!(
            "This comment looks like spam: \"{comment}\"\n\
             Write a single neutral, polite sentence that does not engage with \
             the content of the comment."
        ),
        Category::Question => format!(
            "A user asked this question in a comment: \"{comment}\"\n\
             Write a short, helpful reply that acknowledges the question and \
             directs them to a direct message for details."
        ),
        Category::Complaint => format!(
            "An unhappy customer left this comment: \"{comment}\"\n\
             Write a short, empathetic reply that apologizes and asks them to \
             send a direct message so the issue can be resolved."
        ),
    }
}

/// Static replies substituted when the provider call fails.
pub fn fallback_reply(category: Category) -> &'static str {
    match category {
        Category::Lead => {
            "Thank you for your interest! Please send us a direct message for more information."
        }
        Category::Praise => {
            "Thank you so much for your kind words! We really appreciate your support."
        }
        Category::Spam => {
            "Thank you for your comment. Please feel free to reach out if you have questions about our services."
        }
        Category::Question => {
            "Thanks for reaching out! Please send us a direct message and we'll be happy to help."
        }
        Category::Complaint => {
            "We're sorry to hear about your experience. Please DM us so we can help resolve this."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_nonempty_fallback() {
        for cat in Category::ALL {
            assert!(!fallback_reply(cat).trim().is_empty(), "{cat} fallback empty");
        }
    }

    #[test]
    fn reply_prompts_embed_the_comment() {
        for cat in Category::ALL {
            let p = reply_prompt(cat, "where do I buy this?");
            assert!(p.contains("where do I buy this?"), "{cat} prompt misses comment");
        }
    }

    #[test]
    fn classification_prompt_lists_all_tokens() {
        let p = classification_prompt("hello");
        for cat in Category::ALL {
            assert!(p.contains(cat.as_str()));
        }
    }
}
