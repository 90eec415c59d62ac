/// Background relay: performs the webhook POST on behalf of the popup
///
/// Runs in the extension's service worker, where requests are not bound by
/// the popup page's cross-origin restrictions. Every invocation is
/// independent: one request in, one `RelayResponse` out.

use crate::bridge::{from_js, to_js};
use crate::error::{Error, Result};
use crate::message::{RelayMessage, RelayResponse, SendToWebhook};
use gloo_net::http::Request;
use wasm_bindgen::JsValue;

/// Fallback when a failed response carries no status, reason or body
const REQUEST_FAILED: &str = "Request Failed";

/// Entry point for the runtime.onMessage listener
pub async fn handle_message(message: JsValue) -> std::result::Result<JsValue, JsValue> {
    let response = match from_js::<RelayMessage>(message) {
        Ok(RelayMessage::SendToWebhook(request)) => send_to_webhook(&request).await,
        Err(e) => {
            let error = Error::InvalidMessage(e.to_string());
            log::error!("{}", error);
            RelayResponse::failure(error.to_string())
        }
    };

    to_js(&response).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub async fn send_to_webhook(request: &SendToWebhook) -> RelayResponse {
    match post_json(request).await {
        Ok(()) => {
            log::info!("Webhook accepted payload");
            RelayResponse::success()
        }
        Err(e) => {
            log::warn!("Webhook request failed: {}", e);
            RelayResponse::failure(e.to_string())
        }
    }
}

async fn post_json(request: &SendToWebhook) -> Result<()> {
    let body = serde_json::to_string(&request.payload)?;

    let response = Request::post(&request.webhook_url)
        .header("Content-Type", "application/json")
        .body(body)
        .map_err(network_error)?
        .send()
        .await
        .map_err(network_error)?;

    if response.ok() {
        return Ok(());
    }

    let status = response.status();
    let status_text = response.status_text();
    // Best effort: an unreadable body still reports the status
    let body = response.text().await.unwrap_or_default();

    Err(Error::Http(failure_message(status, &status_text, &body)))
}

fn network_error(error: gloo_net::Error) -> Error {
    match error {
        gloo_net::Error::JsError(js) => Error::Network(js.message),
        other => Error::Network(other.to_string()),
    }
}

/// Join the non-empty parts of a failed response with " - "
pub fn failure_message(status: u16, status_text: &str, body: &str) -> String {
    let status_part = if status != 0 {
        format!("Status {}", status)
    } else {
        String::new()
    };

    let parts: Vec<&str> = [status_part.as_str(), status_text, body]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        REQUEST_FAILED.to_string()
    } else {
        parts.join(" - ")
    }
}
