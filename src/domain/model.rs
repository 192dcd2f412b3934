use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const STATUS_OK: &str = "ok";

/// Body returned by the CRM webhook: `{"status": "ok" | other, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookReply {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WebhookReply {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub reply: WebhookReply,
    pub submitted_at: DateTime<Utc>,
    pub elapsed: Duration,
}
