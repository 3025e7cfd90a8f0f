//! actions.rs — category → recommended moderation/automation actions.
//!
//! Pure and total over the five-category domain; recomputed on every call,
//! never cached.

use serde::{Deserialize, Serialize};

use crate::category::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Normal,
    High,
    Urgent,
}

/// Flags consumed by downstream moderation/automation systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    pub should_pin_comment: bool,
    pub should_hide_comment: bool,
    pub should_flag_urgent: bool,
    pub should_auto_reply: bool,
    pub priority_level: PriorityLevel,
}

impl Default for ActionSet {
    fn default() -> Self {
        Self {
            should_pin_comment: false,
            should_hide_comment: false,
            should_flag_urgent: false,
            should_auto_reply: true,
            priority_level: PriorityLevel::Normal,
        }
    }
}

/// Derive the recommended actions for a category.
pub fn map_actions(category: Category) -> ActionSet {
    let base = ActionSet::default();
    match category {
        Category::Lead => ActionSet {
            should_pin_comment: true,
            priority_level: PriorityLevel::High,
            ..base
        },
        Category::Spam => ActionSet {
            should_hide_comment: true,
            should_auto_reply: false,
            ..base
        },
        Category::Complaint => ActionSet {
            should_flag_urgent: true,
            priority_level: PriorityLevel::Urgent,
            ..base
        },
        Category::Praise | Category::Question => base,
    }
}
