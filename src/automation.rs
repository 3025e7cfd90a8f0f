//! automation.rs — end-to-end orchestration of one inbound comment.
//!
//! Composes the comment pipeline, the action mapper and the optional CRM
//! collaborator into a single `AutomationRecord`, emits one analytics
//! event per comment and keeps running in-memory stats. A single comment's
//! failure never escapes to the caller: CRM errors become record fields
//! and the AI path fails open by construction.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::actions::{map_actions, ActionSet};
use crate::category::Category;
use crate::crm::{ContactCustomFields, ContactInfo, CrmClient, CrmOutcome};
use crate::pipeline::CommentProcessor;

/// Max chars of the comment copied into the CRM custom fields.
const FIRST_COMMENT_MAX_CHARS: usize = 500;

/// Who left the comment. Everything but the username is best-effort;
/// missing fields get synthesized fallbacks in the contact projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One inbound comment descriptor, as delivered by a platform integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundComment {
    pub comment: String,
    pub platform: String,
    pub user_info: UserInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
}

/// Full result of processing one inbound comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRecord {
    pub timestamp: DateTime<Utc>,
    pub platform: String,
    pub comment: String,
    pub user_info: UserInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    pub category: Category,
    pub reply: String,
    /// True when classification or reply ran on a fallback path.
    pub ai_degraded: bool,
    pub ai_success: bool,
    pub actions: ActionSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crm: Option<CrmOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crm_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crm_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Running totals since process start. In-memory only; persistence is an
/// external collaborator concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutomationStats {
    pub total_processed: u64,
    pub leads_captured: u64,
    pub workflows_triggered: u64,
    pub crm_failures: u64,
    pub degraded: u64,
    pub by_category: BTreeMap<String, u64>,
    pub by_platform: BTreeMap<String, u64>,
}

pub struct AutomationSystem {
    processor: CommentProcessor,
    crm: Option<Arc<dyn CrmClient>>,
    stats: Mutex<AutomationStats>,
}

impl AutomationSystem {
    pub fn new(processor: CommentProcessor, crm: Option<Arc<dyn CrmClient>>) -> Self {
        if crm.is_none() {
            tracing::warn!("CRM credentials not configured, running without CRM sync");
        }
        Self {
            processor,
            crm,
            stats: Mutex::new(AutomationStats::default()),
        }
    }

    /// Process one inbound comment end to end.
    pub async fn handle(&self, inbound: InboundComment) -> AutomationRecord {
        let timestamp = Utc::now();
        info!(
            platform = %inbound.platform,
            username = %inbound.user_info.username,
            "processing inbound comment"
        );

        let result = self.processor.process(&inbound.comment).await;
        let actions = map_actions(result.category);

        let mut record = AutomationRecord {
            timestamp,
            platform: inbound.platform.clone(),
            comment: inbound.comment.clone(),
            user_info: inbound.user_info.clone(),
            post_id: inbound.post_id.clone(),
            category: result.category,
            reply: result.reply,
            ai_degraded: result.degraded,
            ai_success: true,
            actions,
            crm: None,
            crm_success: None,
            crm_error: None,
            error: None,
        };

        if let Some(crm) = &self.crm {
            let contact = contact_projection(&inbound, timestamp);
            match crm
                .process_comment(&inbound.comment, record.category, &contact)
                .await
            {
                Ok(outcome) => {
                    if outcome.workflow_triggered {
                        info!(category = %record.category, "CRM workflow triggered");
                    }
                    if !outcome.tags_added.is_empty() {
                        info!(tags = %outcome.tags_added.join(", "), "CRM tags added");
                    }
                    record.crm_success = Some(true);
                    record.crm = Some(outcome);
                }
                Err(err) => {
                    // CRM failure must not invalidate the AI-derived fields.
                    error!(error = %err, "CRM sync failed");
                    counter!("crm_sync_failures_total").increment(1);
                    record.crm_success = Some(false);
                    record.crm_error = Some(err.to_string());
                }
            }
        }

        self.track_analytics(&record);
        record
    }

    /// Batch variant with the same per-item isolation as the pipeline.
    pub async fn handle_batch(&self, inbound: Vec<InboundComment>) -> Vec<AutomationRecord> {
        let mut records = Vec::with_capacity(inbound.len());
        for item in inbound {
            records.push(self.handle(item).await);
        }
        records
    }

    /// Snapshot of the running totals.
    pub fn stats(&self) -> AutomationStats {
        self.stats.lock().expect("poisoned stats").clone()
    }

    /// One analytics event per processed comment: a structured tracing
    /// event, Prometheus counters and the in-memory aggregate.
    fn track_analytics(&self, record: &AutomationRecord) {
        info!(
            event = "comment_processed",
            platform = %record.platform,
            category = %record.category,
            crm_success = record.crm_success.unwrap_or(false),
            timestamp = %record.timestamp.to_rfc3339(),
            "analytics"
        );

        counter!(
            "comments_processed_total",
            "category" => record.category.as_str(),
            "platform" => record.platform.clone()
        )
        .increment(1);

        let mut stats = self.stats.lock().expect("poisoned stats");
        stats.total_processed += 1;
        if record.category == Category::Lead {
            stats.leads_captured += 1;
        }
        if record.crm.as_ref().is_some_and(|c| c.workflow_triggered) {
            stats.workflows_triggered += 1;
        }
        if record.crm_success == Some(false) {
            stats.crm_failures += 1;
        }
        if record.ai_degraded {
            stats.degraded += 1;
        }
        *stats
            .by_category
            .entry(record.category.as_str().to_string())
            .or_insert(0) += 1;
        *stats
            .by_platform
            .entry(record.platform.clone())
            .or_insert(0) += 1;
    }
}

/// Build the CRM contact projection, synthesizing what the platform did
/// not deliver: email from username+platform, display name from username.
fn contact_projection(inbound: &InboundComment, now: DateTime<Utc>) -> ContactInfo {
    let user = &inbound.user_info;
    let username = if user.username.is_empty() {
        "user"
    } else {
        user.username.as_str()
    };

    ContactInfo {
        email: user
            .email
            .clone()
            .unwrap_or_else(|| format!("{username}@{}.social", inbound.platform)),
        first_name: user
            .first_name
            .clone()
            .unwrap_or_else(|| username.to_string()),
        last_name: user.last_name.clone().unwrap_or_else(|| "User".to_string()),
        phone: user.phone.clone().unwrap_or_default(),
        source: format!("{} - Automated", title_case(&inbound.platform)),
        custom_fields: ContactCustomFields {
            social_platform: inbound.platform.clone(),
            social_username: user.username.clone(),
            first_comment: truncate_chars(&inbound.comment, FIRST_COMMENT_MAX_CHARS),
            comment_date: now.to_rfc3339(),
            post_id: inbound
                .post_id
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        },
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
