/// Popup UI for Page to Webhook

use crate::bridge::{from_js, js_error_message, to_js};
use crate::controller::{
    CLOSE_DELAY_MS, DispatchOutcome, Phase, PopupAction, PopupState, RuntimeReply, SendDecision,
    Status,
};
use crate::message::RelayMessage;
use crate::storage::load_config;
use gloo_timers::future::TimeoutFuture;
use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge/runtime.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = getActiveTabUrl)]
    async fn get_active_tab_url() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = sendRuntimeMessage)]
    async fn send_runtime_message(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = openOptionsPage)]
    fn open_options_page();
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(PopupState::default);

    // Load config, then the active tab's URL
    {
        let state = state.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_config().await {
                    Ok(config) => {
                        let configured = config.is_configured();
                        state.dispatch(PopupAction::ConfigLoaded(config));

                        if !configured {
                            log::warn!("No webhook URL configured");
                            return;
                        }

                        match active_tab_url().await {
                            Ok(url) => {
                                log::debug!("Active tab URL: {:?}", url);
                                state.dispatch(PopupAction::TabUrlLoaded(url));
                            }
                            Err(e) => log::error!("Failed to query active tab: {}", e),
                        }
                    }
                    Err(e) => {
                        log::error!("Failed to load config: {}", e);
                        state.dispatch(PopupAction::ConfigUnavailable(e.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let on_url_input = {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                state.dispatch(PopupAction::UrlEdited(input.value()));
            }
        })
    };

    let on_send = {
        let state = state.clone();

        Callback::from(move |_: MouseEvent| {
            let timestamp = String::from(js_sys::Date::new_0().to_iso_string());

            match state.prepare_send(&timestamp) {
                SendDecision::Ignore => {}
                SendDecision::Reject(message) => {
                    state.dispatch(PopupAction::SendRejected(message));
                }
                SendDecision::Send(message) => {
                    state.dispatch(PopupAction::SendStarted);
                    log::info!("Sending page to webhook");

                    let state = state.clone();
                    spawn_local(async move {
                        let outcome = dispatch_to_relay(&message).await;
                        let succeeded = outcome.is_success();
                        state.dispatch(PopupAction::RelayFinished(outcome));

                        if succeeded {
                            TimeoutFuture::new(CLOSE_DELAY_MS).await;
                            close_popup();
                        }
                    });
                }
            }
        })
    };

    let on_settings = Callback::from(|_: MouseEvent| open_options_page());

    let is_busy = state.is_busy();
    let send_label = if state.phase == Phase::Sending {
        "Sending..."
    } else {
        "Send to Webhook"
    };

    html! {
        <div class="popup">
            <div class="popup-header">
                <h1 class="popup-title">{"Page to Webhook"}</h1>
                <Button onclick={on_settings.clone()} variant={ButtonVariant::Secondary}>
                    {"⚙️ Settings"}
                </Button>
            </div>

            {match state.phase {
                Phase::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                Phase::ConfigMissing => html! {
                    <div class="config-error">
                        <Alert r#type={AlertType::Warning} title={"Webhook not configured"} inline={true}>
                            {"Set a webhook URL in the settings before sending pages."}
                        </Alert>
                        <Button onclick={on_settings} variant={ButtonVariant::Primary} block={true}>
                            {"Open Settings"}
                        </Button>
                    </div>
                },
                _ => html! {
                    <div class="main-content">
                        <label class="field-label" for="page-url">{"Page URL"}</label>
                        <input
                            id="page-url"
                            type="url"
                            class="text-input"
                            value={state.page_url.clone()}
                            oninput={on_url_input}
                            disabled={is_busy}
                        />
                        <Button onclick={on_send} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                            {send_label}
                        </Button>
                    </div>
                },
            }}

            // Status region
            {match &state.status {
                Some(Status::Success(message)) => html! {
                    <Alert r#type={AlertType::Success} title={message.clone()} inline={true}>
                    </Alert>
                },
                Some(Status::Error(message)) => html! {
                    <Alert r#type={AlertType::Danger} title={message.clone()} inline={true}>
                    </Alert>
                },
                None => html! {},
            }}
        </div>
    }
}

// Helper functions

async fn active_tab_url() -> Result<Option<String>, String> {
    let url = get_active_tab_url()
        .await
        .map_err(|e| js_error_message(&e))?;
    Ok(url.as_string())
}

async fn dispatch_to_relay(message: &RelayMessage) -> DispatchOutcome {
    let message_js = match to_js(message) {
        Ok(value) => value,
        Err(e) => return DispatchOutcome::Thrown(e.to_string()),
    };

    match send_runtime_message(message_js).await {
        Ok(reply) => match from_js::<RuntimeReply>(reply) {
            Ok(reply) => reply.into_outcome(),
            Err(e) => DispatchOutcome::Thrown(e.to_string()),
        },
        Err(e) => DispatchOutcome::Thrown(js_error_message(&e)),
    }
}

fn close_popup() {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.close() {
            log::error!("Failed to close popup: {}", js_error_message(&e));
        }
    }
}
