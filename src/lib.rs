/// Page to Webhook - Chrome Extension that sends the current page URL to a webhook
/// Built with Rust + WASM + Yew

mod bridge;
mod config;
mod controller;
mod error;
mod message;
mod relay;
mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the settings page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}

/// Handle one `sendToWebhook` message from the background worker's
/// runtime.onMessage listener. Resolves with `{success, error?}`.
#[wasm_bindgen]
pub async fn relay_message(message: JsValue) -> Result<JsValue, JsValue> {
    relay::handle_message(message).await
}
