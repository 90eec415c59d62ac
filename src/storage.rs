/// chrome.storage.sync access for the webhook configuration

use crate::bridge::{from_js, js_error_message, to_js};
use crate::config::{API_KEY_KEY, WEBHOOK_URL_KEY, WebhookConfig};
use crate::error::{Error, Result};
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge/storage.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = getSyncStorage)]
    async fn get_sync_storage(keys: JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = setSyncStorage)]
    async fn set_sync_storage(items: JsValue) -> std::result::Result<(), JsValue>;
}

/// Read both settings, defaulting each missing one to ""
pub async fn load_config() -> Result<WebhookConfig> {
    let keys = to_js(&[WEBHOOK_URL_KEY, API_KEY_KEY])?;
    let items = get_sync_storage(keys)
        .await
        .map_err(|e| Error::Storage(js_error_message(&e)))?;

    if items.is_null() || items.is_undefined() {
        return Ok(WebhookConfig::default());
    }

    from_js(items)
}

pub async fn save_config(config: &WebhookConfig) -> Result<()> {
    let items = to_js(config)?;
    set_sync_storage(items)
        .await
        .map_err(|e| Error::Storage(js_error_message(&e)))?;

    log::info!("Saved webhook configuration");
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// In-memory chrome.storage.sync seeded with `items`; writes fail with
    /// `set_error` when it is non-empty
    fn stub_sync_storage(items: &str, set_error: &str) {
        let script = format!(
            "globalThis.chrome = {{
                runtime: {{ lastError: undefined }},
                storage: {{ sync: {{
                    items: {items},
                    get(keys, callback) {{
                        const out = {{}};
                        for (const key of keys) {{
                            if (key in this.items) out[key] = this.items[key];
                        }}
                        callback(out);
                    }},
                    set(items, callback) {{
                        const error = {set_error:?};
                        if (error) {{
                            chrome.runtime.lastError = {{ message: error }};
                        }} else {{
                            Object.assign(this.items, items);
                        }}
                        callback();
                        chrome.runtime.lastError = undefined;
                    }},
                }} }},
            }};"
        );
        js_sys::Function::new_no_args(&script)
            .call0(&JsValue::NULL)
            .unwrap();
    }

    #[wasm_bindgen_test]
    async fn test_save_then_load_round_trip() {
        stub_sync_storage("{}", "");
        let config = WebhookConfig::new("https://hooks.example.com/abc", "secret");

        save_config(&config).await.unwrap();
        let loaded = load_config().await.unwrap();

        assert_eq!(loaded, config);
    }

    #[wasm_bindgen_test]
    async fn test_load_defaults_when_empty() {
        stub_sync_storage("{}", "");

        assert_eq!(load_config().await.unwrap(), WebhookConfig::default());
    }

    #[wasm_bindgen_test]
    async fn test_load_tolerates_null_api_key() {
        stub_sync_storage("{ webhookUrl: 'https://hooks.example.com', apiKey: null }", "");

        let loaded = load_config().await.unwrap();

        assert_eq!(loaded, WebhookConfig::new("https://hooks.example.com", ""));
        assert!(loaded.is_configured());
    }

    #[wasm_bindgen_test]
    async fn test_save_failure_is_reported() {
        stub_sync_storage("{}", "QUOTA_BYTES quota exceeded");

        let error = save_config(&WebhookConfig::new("https://hooks.example.com", ""))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "storage error: QUOTA_BYTES quota exceeded");
    }
}
