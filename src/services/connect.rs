use anyhow::Result;
use reqwest::Client;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub destination_number: String,
    pub contact_flow_id: String,
    pub instance_id: String,
    pub queue_id: String,
    /// Envelope timestamp, passed through opaquely.
    pub timestamp: String,
    /// Normalized number the agent should call back.
    pub callback_number: String,
}

/// Places the outbound call-queue contact. Returns the opaque contact id
/// assigned by the voice service.
pub async fn start_outbound_contact(
    client: &Client,
    base_url: &str,
    req: &DispatchRequest,
) -> Result<String> {
    let payload = serde_json::json!({
        "DestinationPhoneNumber": req.destination_number,
        "ContactFlowId": req.contact_flow_id,
        "InstanceId": req.instance_id,
        "QueueId": req.queue_id,
        "ClientToken": uuid::Uuid::new_v4().to_string(),
        "Attributes": {
            "timestamp": req.timestamp,
            "callbacknumber": req.callback_number,
        }
    });
    let resp = client
        .put(format!("{}/contact/outbound-voice", base_url))
        .json(&payload)
        .send()
        .await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("outbound contact failed: {} {}", status, body));
    }
    let value: Value = resp.json().await?;
    let contact_id = value
        .get("ContactId")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    Ok(contact_id)
}
