/// Settings page: webhook URL and optional API key

use std::rc::Rc;

use crate::config::{SAVE_ACK_MS, WebhookConfig, generate_api_key};
use crate::storage::{load_config, save_config};
use gloo_timers::future::TimeoutFuture;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq, Default)]
enum SaveState {
    #[default]
    Idle,
    Saving,
    Saved,
    Error(String),
}

/// Save status tagged with the save attempt it belongs to, so a late
/// acknowledgement timer or result never overwrites a newer attempt
#[derive(Debug, Clone, PartialEq, Default)]
struct SaveStatus {
    generation: u32,
    state: SaveState,
}

enum SaveAction {
    Started(u32),
    Saved(u32),
    Failed(u32, String),
    AckElapsed(u32),
    /// Load or key generation failure, not tied to a save
    Error(String),
}

impl Reducible for SaveStatus {
    type Action = SaveAction;

    fn reduce(self: Rc<Self>, action: SaveAction) -> Rc<Self> {
        let next = match action {
            SaveAction::Started(generation) => SaveStatus {
                generation,
                state: SaveState::Saving,
            },
            SaveAction::Saved(generation) if generation == self.generation => SaveStatus {
                generation,
                state: SaveState::Saved,
            },
            SaveAction::Failed(generation, message) if generation == self.generation => SaveStatus {
                generation,
                state: SaveState::Error(message),
            },
            SaveAction::AckElapsed(generation)
                if generation == self.generation && self.state == SaveState::Saved =>
            {
                SaveStatus {
                    generation,
                    state: SaveState::Idle,
                }
            }
            SaveAction::Error(message) => SaveStatus {
                generation: self.generation,
                state: SaveState::Error(message),
            },
            _ => return self,
        };

        Rc::new(next)
    }
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let webhook_url = use_state(String::new);
    let api_key = use_state(String::new);
    let save_status = use_reducer(SaveStatus::default);
    let save_generation = use_mut_ref(|| 0u32);

    // Restore stored values on mount
    {
        let webhook_url = webhook_url.clone();
        let api_key = api_key.clone();
        let save_status = save_status.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_config().await {
                    Ok(config) => {
                        webhook_url.set(config.webhook_url);
                        api_key.set(config.api_key);
                    }
                    Err(e) => {
                        log::error!("Failed to load config: {}", e);
                        save_status.dispatch(SaveAction::Error(format!("Failed to load: {}", e)));
                    }
                }
            });
            || ()
        });
    }

    let on_webhook_input = {
        let webhook_url = webhook_url.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                webhook_url.set(input.value());
            }
        })
    };

    let on_api_key_input = {
        let api_key = api_key.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                api_key.set(input.value());
            }
        })
    };

    // Fills the field only; the user still has to save
    let on_generate = {
        let api_key = api_key.clone();
        let save_status = save_status.clone();

        Callback::from(move |_: MouseEvent| match generate_api_key() {
            Ok(key) => api_key.set(key),
            Err(e) => {
                log::error!("Failed to generate key: {}", e);
                save_status.dispatch(SaveAction::Error(format!("Failed to generate key: {}", e)));
            }
        })
    };

    let on_save = {
        let webhook_url = webhook_url.clone();
        let api_key = api_key.clone();
        let save_status = save_status.clone();
        let save_generation = save_generation.clone();

        Callback::from(move |_: MouseEvent| {
            let config = WebhookConfig::new((*webhook_url).clone(), (*api_key).clone());
            let save_status = save_status.clone();
            let generation = {
                let mut counter = save_generation.borrow_mut();
                *counter += 1;
                *counter
            };

            save_status.dispatch(SaveAction::Started(generation));
            spawn_local(async move {
                match save_config(&config).await {
                    Ok(()) => {
                        save_status.dispatch(SaveAction::Saved(generation));
                        TimeoutFuture::new(SAVE_ACK_MS).await;
                        save_status.dispatch(SaveAction::AckElapsed(generation));
                    }
                    Err(e) => {
                        log::error!("Failed to save config: {}", e);
                        save_status.dispatch(SaveAction::Failed(generation, format!("Failed to save: {}", e)));
                    }
                }
            });
        })
    };

    let is_saving = save_status.state == SaveState::Saving;

    html! {
        <div class="container">
            <h1 class="main-title">{"Page to Webhook Settings"}</h1>

            <div class="form-group">
                <label class="field-label" for="webhook-url">{"Webhook URL"}</label>
                <input
                    id="webhook-url"
                    type="url"
                    class="text-input"
                    placeholder="https://example.com/webhook"
                    value={(*webhook_url).clone()}
                    oninput={on_webhook_input}
                />
            </div>

            <div class="form-group">
                <label class="field-label" for="api-key">{"API Key (optional)"}</label>
                <div class="api-key-row">
                    <input
                        id="api-key"
                        type="text"
                        class="text-input"
                        value={(*api_key).clone()}
                        oninput={on_api_key_input}
                    />
                    <Button onclick={on_generate} variant={ButtonVariant::Secondary}>
                        {"Generate Key"}
                    </Button>
                </div>
                <p class="field-hint">{"Sent as \"apiKey\" with every payload when set."}</p>
            </div>

            <Button onclick={on_save} disabled={is_saving} variant={ButtonVariant::Primary}>
                {"Save"}
            </Button>

            {match &save_status.state {
                SaveState::Saved => html! {
                    <Alert r#type={AlertType::Success} title={"Options saved."} inline={true}>
                    </Alert>
                },
                SaveState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                SaveState::Idle | SaveState::Saving => html! {},
            }}
        </div>
    }
}
