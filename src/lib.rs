// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod actions;
pub mod api;
pub mod automation;
pub mod category;
pub mod classify;
pub mod config;
pub mod crm;
pub mod metrics;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod reply;

// ---- Re-exports for stable public API ----
pub use crate::actions::{map_actions, ActionSet, PriorityLevel};
pub use crate::api::{create_router, AppState};
pub use crate::automation::{AutomationRecord, AutomationSystem, InboundComment, UserInfo};
pub use crate::category::Category;
pub use crate::pipeline::{CommentProcessor, CommentResult};
