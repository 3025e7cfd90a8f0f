//! crm.rs — CRM collaborator boundary (contact upsert, tags, workflows).
//!
//! The core treats the CRM as opaque beyond the request/response contract:
//! it sends (comment, category, contact info) and reads back whether a
//! contact was created, which tags were applied and whether a workflow
//! fired. Credentials are optional; without them the system runs with CRM
//! sync disabled.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Failure taxonomy for CRM calls. Recovered at the orchestrator boundary:
/// recorded on the automation record, never propagated.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CrmError {
    #[error("network error: {0}")]
    Network(String),

    #[error("CRM returned status {0}")]
    Api(u16),

    #[error("malformed CRM response: {0}")]
    Malformed(String),
}

/// Contact projection sent to the CRM. Field names follow the CRM wire
/// format (camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub phone: String,
    pub source: String,
    #[serde(rename = "customFields")]
    pub custom_fields: ContactCustomFields,
}

/// Custom fields attached to the contact on first touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactCustomFields {
    pub social_platform: String,
    pub social_username: String,
    /// First 500 chars of the triggering comment.
    pub first_comment: String,
    pub comment_date: String,
    pub post_id: String,
}

/// What the CRM reports back after processing one comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    pub contact_created: bool,
    pub tags_added: Vec<String>,
    pub workflow_triggered: bool,
}

#[async_trait::async_trait]
pub trait CrmClient: Send + Sync {
    /// Sync one processed comment into the CRM.
    async fn process_comment(
        &self,
        comment: &str,
        category: Category,
        contact: &ContactInfo,
    ) -> Result<CrmOutcome, CrmError>;
}

/// Tags applied per category. Every contact gets `social-comment`; only
/// leads additionally enter the nurture workflow.
pub fn category_tags(category: Category) -> Vec<String> {
    let specific = match category {
        Category::Lead => "lead-inquiry",
        Category::Praise => "happy-customer",
        Category::Spam => "spam-flagged",
        Category::Question => "has-question",
        Category::Complaint => "complaint-urgent",
    };
    vec!["social-comment".to_string(), specific.to_string()]
}

// ------------------------------------------------------------
// HTTP client
// ------------------------------------------------------------

/// REST client for the CRM. Reads `CRM_API_KEY` / `CRM_LOCATION_ID`; absent
/// credentials mean the integration is disabled (callers hold an
/// `Option<Arc<dyn CrmClient>>`).
pub struct HttpCrmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    location_id: String,
}

impl HttpCrmClient {
    const DEFAULT_BASE_URL: &'static str = "https://rest.gohighlevel.com/v1";

    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("CRM_API_KEY").ok()?;
        let location_id = std::env::var("CRM_LOCATION_ID").ok()?;
        Some(Self::new(Self::DEFAULT_BASE_URL.to_string(), api_key, location_id))
    }

    /// Builder for tests/tools pointing at a stub server.
    pub fn new(base_url: String, api_key: String, location_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            location_id,
        }
    }

    async fn upsert_contact(
        &self,
        contact: &ContactInfo,
        tags: &[String],
    ) -> Result<(String, bool), CrmError> {
        #[derive(Serialize)]
        struct UpsertReq<'a> {
            #[serde(rename = "locationId")]
            location_id: &'a str,
            #[serde(flatten)]
            contact: &'a ContactInfo,
            tags: &'a [String],
        }
        #[derive(Deserialize)]
        struct UpsertResp {
            contact: UpsertedContact,
            #[serde(default)]
            new: bool,
        }
        #[derive(Deserialize)]
        struct UpsertedContact {
            id: String,
        }

        let resp = self
            .http
            .post(format!("{}/contacts/upsert", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&UpsertReq {
                location_id: &self.location_id,
                contact,
                tags,
            })
            .send()
            .await
            .map_err(|e| CrmError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CrmError::Api(status.as_u16()));
        }
        let body: UpsertResp = resp
            .json()
            .await
            .map_err(|e| CrmError::Malformed(e.to_string()))?;
        Ok((body.contact.id, body.new))
    }

    async fn trigger_lead_workflow(&self, contact_id: &str) -> Result<(), CrmError> {
        let resp = self
            .http
            .post(format!(
                "{}/contacts/{contact_id}/workflow/lead-nurture",
                self.base_url
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| CrmError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CrmError::Api(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CrmClient for HttpCrmClient {
    async fn process_comment(
        &self,
        _comment: &str,
        category: Category,
        contact: &ContactInfo,
    ) -> Result<CrmOutcome, CrmError> {
        let tags = category_tags(category);
        let (contact_id, created) = self.upsert_contact(contact, &tags).await?;

        let mut workflow_triggered = false;
        if category == Category::Lead {
            self.trigger_lead_workflow(&contact_id).await?;
            workflow_triggered = true;
            tracing::info!(contact_id = %contact_id, "lead nurture workflow triggered");
        }

        Ok(CrmOutcome {
            contact_id: Some(contact_id),
            contact_created: created,
            tags_added: tags,
            workflow_triggered,
        })
    }
}

// ------------------------------------------------------------
// Test client
// ------------------------------------------------------------

/// In-memory CRM for tests: records every call, answers with a canned
/// result or a canned failure.
pub struct MockCrmClient {
    pub calls: Mutex<Vec<(String, Category, ContactInfo)>>,
    fail_with: Option<CrmError>,
}

impl MockCrmClient {
    pub fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    pub fn failing(err: CrmError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(err),
        }
    }
}

#[async_trait::async_trait]
impl CrmClient for MockCrmClient {
    async fn process_comment(
        &self,
        comment: &str,
        category: Category,
        contact: &ContactInfo,
    ) -> Result<CrmOutcome, CrmError> {
        self.calls
            .lock()
            .expect("poisoned calls")
            .push((comment.to_string(), category, contact.clone()));

        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(CrmOutcome {
            contact_id: Some("mock-contact".to_string()),
            contact_created: true,
            tags_added: category_tags(category),
            workflow_triggered: category == Category::Lead,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_two_tags() {
        for cat in Category::ALL {
            let tags = category_tags(cat);
            assert_eq!(tags.len(), 2);
            assert_eq!(tags[0], "social-comment");
        }
    }

    #[test]
    fn contact_info_serializes_with_crm_wire_names() {
        let contact = ContactInfo {
            email: "a@b.social".into(),
            first_name: "Ada".into(),
            last_name: "User".into(),
            phone: String::new(),
            source: "Instagram - Automated".into(),
            custom_fields: ContactCustomFields {
                social_platform: "instagram".into(),
                social_username: "ada".into(),
                first_comment: "hello".into(),
                comment_date: "2025-01-01T00:00:00Z".into(),
                post_id: "Unknown".into(),
            },
        };
        let json = serde_json::to_value(&contact).unwrap();
        assert!(json.get("firstName").is_some());
        assert!(json.get("lastName").is_some());
        assert!(json.get("customFields").is_some());
        assert!(json.get("first_name").is_none());
    }
}
