/// Popup state machine
///
/// Loading → {ConfigMissing | Ready} → Sending → {Succeeded | Ready}
///
/// The popup component owns one `PopupState` through `use_reducer`; every
/// transition goes through `PopupAction` so the logic stays testable
/// without a browser.

use std::rc::Rc;

use crate::config::WebhookConfig;
use crate::message::{OutboundPayload, RelayMessage, RelayResponse};
use serde::Deserialize;
use yew::prelude::*;

/// Delay before the popup closes itself after a successful send
pub const CLOSE_DELAY_MS: u32 = 1500;

pub const SUCCESS_MESSAGE: &str = "Successfully sent!";
pub const MISSING_WEBHOOK_MESSAGE: &str = "Error: No Webhook URL configured.";
pub const NO_RESPONSE_MESSAGE: &str =
    "Error: No response from background script. Please Reload Extension.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Loading,
    ConfigMissing,
    Ready,
    Sending,
    /// Waiting for the auto-close
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopupState {
    pub phase: Phase,
    pub config: WebhookConfig,
    pub page_url: String,
    pub status: Option<Status>,
}

pub enum PopupAction {
    ConfigLoaded(WebhookConfig),
    ConfigUnavailable(String),
    TabUrlLoaded(Option<String>),
    UrlEdited(String),
    SendRejected(String),
    SendStarted,
    RelayFinished(DispatchOutcome),
}

/// What a click on "Send" should do in the current state
#[derive(Debug, PartialEq)]
pub enum SendDecision {
    Ignore,
    Reject(String),
    Send(RelayMessage),
}

/// How a runtime.sendMessage round trip ended
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Delivered(RelayResponse),
    /// The listener closed the channel without answering
    NoResponse,
    /// runtime.lastError was set
    ChannelError(String),
    /// The bridge call itself failed
    Thrown(String),
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered(response) if response.success)
    }

    pub fn status(&self) -> Status {
        match self {
            DispatchOutcome::Delivered(response) if response.success => {
                Status::Success(SUCCESS_MESSAGE.to_string())
            }
            DispatchOutcome::Delivered(response) => {
                let error = response
                    .error
                    .as_deref()
                    .filter(|error| !error.is_empty())
                    .unwrap_or("Unknown error");
                Status::Error(format!("Failed: {}", error))
            }
            DispatchOutcome::NoResponse => Status::Error(NO_RESPONSE_MESSAGE.to_string()),
            DispatchOutcome::ChannelError(message) => {
                Status::Error(format!("Extension Error: {}", message))
            }
            DispatchOutcome::Thrown(message) => Status::Error(format!("Error: {}", message)),
        }
    }
}

/// Shape resolved by the runtime bridge's sendRuntimeMessage
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeReply {
    #[serde(default)]
    pub response: Option<RelayResponse>,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl RuntimeReply {
    pub fn into_outcome(self) -> DispatchOutcome {
        if let Some(error) = self.last_error {
            return DispatchOutcome::ChannelError(error);
        }

        match self.response {
            Some(response) => DispatchOutcome::Delivered(response),
            None => DispatchOutcome::NoResponse,
        }
    }
}

impl PopupState {
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Sending | Phase::Succeeded)
    }

    pub fn prepare_send(&self, timestamp: &str) -> SendDecision {
        if self.phase != Phase::Ready || self.page_url.is_empty() {
            return SendDecision::Ignore;
        }

        if !self.config.is_configured() {
            return SendDecision::Reject(MISSING_WEBHOOK_MESSAGE.to_string());
        }

        let payload = OutboundPayload::new(self.page_url.clone(), timestamp, &self.config.api_key);
        match RelayMessage::send_to_webhook(&self.config.webhook_url, &payload) {
            Ok(message) => SendDecision::Send(message),
            Err(e) => SendDecision::Reject(format!("Error: {}", e)),
        }
    }
}

impl Reducible for PopupState {
    type Action = PopupAction;

    fn reduce(self: Rc<Self>, action: PopupAction) -> Rc<Self> {
        let mut next = (*self).clone();

        match action {
            PopupAction::ConfigLoaded(config) => {
                next.phase = if config.is_configured() {
                    Phase::Ready
                } else {
                    Phase::ConfigMissing
                };
                next.config = config;
            }
            PopupAction::ConfigUnavailable(reason) => {
                next.phase = Phase::ConfigMissing;
                next.status = Some(Status::Error(format!("Error: {}", reason)));
            }
            // Never clobber what the user typed while tabs.query was pending
            PopupAction::TabUrlLoaded(url) => {
                if let (Phase::Ready, Some(url)) = (next.phase, url) {
                    if next.page_url.is_empty() {
                        next.page_url = url;
                    }
                }
            }
            PopupAction::UrlEdited(url) => {
                next.page_url = url;
            }
            PopupAction::SendRejected(message) => {
                next.status = Some(Status::Error(message));
            }
            PopupAction::SendStarted => {
                if next.phase != Phase::Ready {
                    return self;
                }
                next.phase = Phase::Sending;
                next.status = None;
            }
            PopupAction::RelayFinished(outcome) => {
                next.phase = if outcome.is_success() {
                    Phase::Succeeded
                } else {
                    Phase::Ready
                };
                next.status = Some(outcome.status());
            }
        }

        Rc::new(next)
    }
}
