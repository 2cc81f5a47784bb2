use crate::services::{connect, pinpoint};
use crate::types::{HandlerOutcome, InboundMessageEvent, SkipReason, SnsEnvelope};
use crate::AppState;
use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

/// US-only normalization: a bare 10-digit number gains the +1 country prefix,
/// anything else passes through untouched.
pub fn normalize_us_number(number: &str) -> String {
    if number.len() == 10 && number.chars().all(|c| c.is_ascii_digit()) {
        format!("+1{}", number)
    } else {
        number.to_string()
    }
}

/// Case-insensitive substring containment; `keyword` is already lowercased
/// at config load.
pub fn keyword_matches(keyword: &str, body: &str) -> bool {
    body.to_lowercase().contains(keyword)
}

/// Runs the full inbound flow for one delivery envelope: parse, gate on the
/// keyword, validate the sender, then dispatch the call-queue contact and the
/// confirmation SMS. The two downstream calls are independent; a failure in
/// one is logged and does not suppress the other.
pub async fn handle_envelope(state: &AppState, envelope: &SnsEnvelope) -> Result<HandlerOutcome> {
    let record = envelope
        .records
        .first()
        .ok_or_else(|| anyhow::anyhow!("envelope has no records"))?;

    info!("received event: {}", record.sns.message);
    let event: InboundMessageEvent = serde_json::from_str(&record.sns.message)?;
    let timestamp = record
        .sns
        .timestamp
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let number = normalize_us_number(&event.origination_number);

    if !keyword_matches(&state.config.keyword, &event.message_body) {
        info!("keyword not present, ignoring message from {number}");
        return Ok(HandlerOutcome::Skipped(SkipReason::KeywordNotFound));
    }

    // Fail closed: a validation error means no callback is issued.
    let validation =
        match pinpoint::validate_number(&state.http, &state.config.pinpoint_endpoint(), &number)
            .await
        {
            Ok(validation) => validation,
            Err(err) => {
                error!("number validation error for {number}: {err:?}");
                return Ok(HandlerOutcome::Skipped(SkipReason::ValidationFailed));
            }
        };
    if !validation.is_legitimate() {
        info!("received a phone number that is invalid for US ({number}), cancelling flow");
        return Ok(HandlerOutcome::Skipped(SkipReason::InvalidNumber));
    }
    info!("legitimate number, issuing callback for {number}");

    let dispatch = connect::DispatchRequest {
        destination_number: state.config.connect.fallback_number.clone(),
        contact_flow_id: state.config.connect.contact_flow_id.clone(),
        instance_id: state.config.connect.instance_id.clone(),
        queue_id: state.config.connect.queue_id.clone(),
        timestamp,
        callback_number: number.clone(),
    };
    let contact_id =
        match connect::start_outbound_contact(&state.http, &state.config.connect_endpoint(), &dispatch)
            .await
        {
            Ok(contact_id) => {
                info!("successfully issued call back to {number} (contact {contact_id})");
                Some(contact_id)
            }
            Err(err) => {
                error!("callback dispatch error for {number}: {err:?}");
                None
            }
        };

    match pinpoint::send_confirmation(
        &state.http,
        &state.config.pinpoint_endpoint(),
        &state.config.pinpoint.application_id,
        &number,
    )
    .await
    {
        Ok(status) if status == "SUCCESSFUL" => {
            info!("successfully confirmed the call back via SMS to {number}");
        }
        Ok(_) => {}
        Err(err) => error!("confirmation send error for {number}: {err:?}"),
    }

    Ok(HandlerOutcome::Dispatched { contact_id })
}
