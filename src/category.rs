//! category.rs — the closed classification taxonomy.
//!
//! Every comment resolves to exactly one of these five labels. Nothing
//! outside this set ever crosses the classifier boundary; raw provider
//! text that does not normalize into a member is remapped upstream.

use serde::{Deserialize, Serialize};

/// Classification label for a social-media comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Lead,
    Praise,
    Spam,
    Question,
    Complaint,
}

impl Category {
    /// All members, in a stable order (used by stats and tests).
    pub const ALL: [Category; 5] = [
        Category::Lead,
        Category::Praise,
        Category::Spam,
        Category::Question,
        Category::Complaint,
    ];

    /// Uppercase wire token, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Lead => "LEAD",
            Category::Praise => "PRAISE",
            Category::Spam => "SPAM",
            Category::Question => "QUESTION",
            Category::Complaint => "COMPLAINT",
        }
    }

    /// Normalize raw provider output into a member of the set.
    ///
    /// Trims whitespace and uppercases before matching; anything that is
    /// not exactly one of the five tokens yields `None`.
    pub fn parse(raw: &str) -> Option<Category> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LEAD" => Some(Category::Lead),
            "PRAISE" => Some(Category::Praise),
            "SPAM" => Some(Category::Spam),
            "QUESTION" => Some(Category::Question),
            "COMPLAINT" => Some(Category::Complaint),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_exact_tokens() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
    }

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(Category::parse("  lead \n"), Some(Category::Lead));
        assert_eq!(Category::parse("Complaint"), Some(Category::Complaint));
    }

    #[test]
    fn parse_rejects_anything_else() {
        assert_eq!(Category::parse("LEAD."), None);
        assert_eq!(Category::parse("I think this is SPAM"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn serde_uses_uppercase_tokens() {
        let json = serde_json::to_string(&Category::Question).unwrap();
        assert_eq!(json, "\"QUESTION\"");
        let back: Category = serde_json::from_str("\"SPAM\"").unwrap();
        assert_eq!(back, Category::Spam);
    }
}
