/// Runtime messages between the popup and the background relay,
/// and the JSON body that is posted to the webhook

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Body posted to the webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundPayload {
    pub text: String,
    pub timestamp: String,
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl OutboundPayload {
    /// An empty `api_key` leaves the field out of the body entirely
    pub fn new(text: impl Into<String>, timestamp: impl Into<String>, api_key: &str) -> Self {
        OutboundPayload {
            text: text.into(),
            timestamp: timestamp.into(),
            api_key: (!api_key.is_empty()).then(|| api_key.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendToWebhook {
    pub webhook_url: String,
    pub payload: serde_json::Value,
}

/// `{action, data}` envelope understood by the background listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum RelayMessage {
    #[serde(rename = "sendToWebhook")]
    SendToWebhook(SendToWebhook),
}

impl RelayMessage {
    pub fn send_to_webhook(webhook_url: &str, payload: &OutboundPayload) -> Result<Self> {
        Ok(RelayMessage::SendToWebhook(SendToWebhook {
            webhook_url: webhook_url.to_string(),
            payload: serde_json::to_value(payload)?,
        }))
    }
}

/// Exactly one of these answers every relay request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn success() -> Self {
        RelayResponse {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        RelayResponse {
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_omits_empty_api_key() {
        let payload = OutboundPayload::new("https://example.com", "2024-01-01T00:00:00.000Z", "");

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            json!({"text": "https://example.com", "timestamp": "2024-01-01T00:00:00.000Z"})
        );
        assert!(json.get("apiKey").is_none());
    }

    #[test]
    fn test_payload_includes_api_key() {
        let payload = OutboundPayload::new("https://example.com", "2024-01-01T00:00:00.000Z", "k3y");

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["apiKey"], "k3y");
    }

    #[test]
    fn test_relay_message_envelope() {
        let payload = OutboundPayload::new("https://example.com/page", "2024-01-01T00:00:00.000Z", "k");
        let message = RelayMessage::send_to_webhook("https://hooks.example.com", &payload).unwrap();

        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(
            json,
            json!({
                "action": "sendToWebhook",
                "data": {
                    "webhookUrl": "https://hooks.example.com",
                    "payload": {
                        "text": "https://example.com/page",
                        "timestamp": "2024-01-01T00:00:00.000Z",
                        "apiKey": "k"
                    }
                }
            })
        );
    }

    #[test]
    fn test_relay_message_accepts_arbitrary_payload() {
        let raw = json!({
            "action": "sendToWebhook",
            "data": {"webhookUrl": "https://hooks.example.com", "payload": {"custom": [1, 2, 3]}}
        });

        let RelayMessage::SendToWebhook(request) = serde_json::from_value(raw).unwrap();

        assert_eq!(request.webhook_url, "https://hooks.example.com");
        assert_eq!(request.payload, json!({"custom": [1, 2, 3]}));
    }

    #[test]
    fn test_relay_message_rejects_unknown_action() {
        let raw = json!({"action": "somethingElse", "data": {}});
        assert!(serde_json::from_value::<RelayMessage>(raw).is_err());
    }

    #[test]
    fn test_response_shapes() {
        assert_eq!(serde_json::to_value(RelayResponse::success()).unwrap(), json!({"success": true}));
        assert_eq!(
            serde_json::to_value(RelayResponse::failure("Failed to fetch")).unwrap(),
            json!({"success": false, "error": "Failed to fetch"})
        );

        let parsed: RelayResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(parsed.error, None);
    }
}
