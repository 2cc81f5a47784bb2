use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

/// Phone-type classification the validation service assigns to unreachable
/// numbers. Anything else, including codes we do not know about, counts as
/// legitimate.
pub const INVALID_PHONE_TYPE_CODE: i64 = 3;

pub const CONFIRMATION_BODY: &str = "Your number has been added to the call queue!";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PhoneValidation {
    #[serde(rename = "PhoneTypeCode")]
    pub phone_type_code: Option<i64>,
    #[serde(rename = "PhoneType")]
    pub phone_type: Option<String>,
    #[serde(rename = "CountryCodeIso2")]
    pub country_code_iso2: Option<String>,
    #[serde(rename = "Carrier")]
    pub carrier: Option<String>,
}

impl PhoneValidation {
    pub fn is_legitimate(&self) -> bool {
        self.phone_type_code != Some(INVALID_PHONE_TYPE_CODE)
    }
}

pub async fn validate_number(
    client: &Client,
    base_url: &str,
    number: &str,
) -> Result<PhoneValidation> {
    let payload = serde_json::json!({
        "NumberValidateRequest": {
            "IsoCountryCode": "US",
            "PhoneNumber": number,
        }
    });
    let resp = client
        .post(format!("{}/v1/phone/number/validate", base_url))
        .json(&payload)
        .send()
        .await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("number validate failed: {} {}", status, body));
    }
    let value: Value = resp.json().await?;
    let validation = value
        .get("NumberValidateResponse")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("number validate response missing body: {}", value))?;
    Ok(serde_json::from_value(validation)?)
}

/// Sends the fixed transactional confirmation SMS. A non-successful delivery
/// status is logged and returned as data; the caller never retries.
pub async fn send_confirmation(
    client: &Client,
    base_url: &str,
    application_id: &str,
    number: &str,
) -> Result<String> {
    let payload = serde_json::json!({
        "MessageRequest": {
            "Addresses": {
                number: { "ChannelType": "SMS" }
            },
            "MessageConfiguration": {
                "SMSMessage": {
                    "Body": CONFIRMATION_BODY,
                    "MessageType": "TRANSACTIONAL",
                }
            }
        }
    });
    let resp = client
        .post(format!("{}/v1/apps/{}/messages", base_url, application_id))
        .json(&payload)
        .send()
        .await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("confirmation send failed: {} {}", status, body));
    }

    let value: Value = resp.json().await?;
    let delivery_status = value
        .get("MessageResponse")
        .and_then(|v| v.get("Result"))
        .and_then(|v| v.get(number))
        .and_then(|v| v.get("DeliveryStatus"))
        .and_then(|v| v.as_str())
        .unwrap_or("UNKNOWN")
        .to_string();

    if delivery_status != "SUCCESSFUL" {
        warn!("failed to send SMS confirmation to {number}: {delivery_status}");
    }
    Ok(delivery_status)
}
