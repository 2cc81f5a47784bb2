use serde::{Deserialize, Serialize};

/// Delivery envelope as posted by the notification fan-out. One record per
/// invocation; `Message` is itself a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnsRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsNotification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnsNotification {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
}

/// Inbound SMS payload carried inside the envelope message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessageEvent {
    pub origination_number: String,
    pub message_body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    KeywordNotFound,
    InvalidNumber,
    ValidationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    Dispatched { contact_id: Option<String> },
    Skipped(SkipReason),
}
