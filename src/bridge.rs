/// Conversions across the JS boundary for chrome.* bridge calls

use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};

/// Serialize into plain JS objects (never `Map`) so values survive
/// chrome.storage and runtime messaging, which both JSON-clone
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

pub fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// Best readable message for a rejected promise or thrown value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }

    if let Some(text) = value.as_string() {
        return text;
    }

    // chrome.runtime.lastError is a plain object with a message field
    if value.is_object() {
        if let Some(message) = js_sys::Reflect::get(value, &JsValue::from_str("message"))
            .ok()
            .and_then(|message| message.as_string())
        {
            return message;
        }
    }

    format!("{:?}", value)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::message::{OutboundPayload, RelayMessage, RelayResponse};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn get(target: &JsValue, key: &str) -> JsValue {
        js_sys::Reflect::get(target, &JsValue::from_str(key)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_relay_message_is_plain_object() {
        let payload = OutboundPayload::new("https://example.com", "2024-01-01T00:00:00.000Z", "");
        let message = RelayMessage::send_to_webhook("https://hooks.example.com", &payload).unwrap();

        let js = to_js(&message).unwrap();
        let data = get(&js, "data");
        let payload_js = get(&data, "payload");

        assert_eq!(get(&js, "action").as_string().as_deref(), Some("sendToWebhook"));
        assert_eq!(get(&data, "webhookUrl").as_string().as_deref(), Some("https://hooks.example.com"));
        assert!(!payload_js.is_instance_of::<js_sys::Map>());
        assert_eq!(get(&payload_js, "text").as_string().as_deref(), Some("https://example.com"));
        assert!(get(&payload_js, "apiKey").is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_relay_message_decodes_from_js() {
        let payload = OutboundPayload::new("https://example.com", "2024-01-01T00:00:00.000Z", "key");
        let message = RelayMessage::send_to_webhook("https://hooks.example.com", &payload).unwrap();

        let decoded: RelayMessage = from_js(to_js(&message).unwrap()).unwrap();

        assert_eq!(decoded, message);
    }

    #[wasm_bindgen_test]
    fn test_response_without_error_field() {
        let js = to_js(&RelayResponse::success()).unwrap();

        assert_eq!(get(&js, "success").as_bool(), Some(true));
        assert!(get(&js, "error").is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_js_error_message_variants() {
        let thrown: JsValue = js_sys::Error::new("boom").into();
        assert_eq!(js_error_message(&thrown), "boom");

        assert_eq!(js_error_message(&JsValue::from_str("plain")), "plain");

        let last_error = js_sys::Object::new();
        js_sys::Reflect::set(&last_error, &"message".into(), &"Receiving end does not exist.".into()).unwrap();
        assert_eq!(js_error_message(&last_error.into()), "Receiving end does not exist.");
    }

    #[wasm_bindgen_test]
    fn test_iso_timestamp_from_js_date() {
        let timestamp = String::from(js_sys::Date::new(&JsValue::from_f64(0.0)).to_iso_string());
        assert_eq!(timestamp, "1970-01-01T00:00:00.000Z");
    }
}
