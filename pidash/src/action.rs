//! Privileged actions (shutdown, update): credential prompt, confirmation,
//! request, and the response-status policy.

use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use tracing::info;

use crate::api::{ApiClient, RawReply};
use crate::diagnostics::Diagnostics;
use crate::error::ClientError;
use crate::interact::Interaction;
use crate::types::ActionReply;

pub const WRONG_API_KEY: &str = "Wrong API key";
pub const TOO_MANY_REQUESTS: &str = "Too many requests";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Shutdown,
    Update,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Shutdown, Action::Update];

    pub fn name(self) -> &'static str {
        match self {
            Action::Shutdown => "shutdown",
            Action::Update => "update",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Action::Shutdown => "api/shutdown",
            Action::Update => "api/update",
        }
    }

    pub fn button_id(self) -> &'static str {
        match self {
            Action::Shutdown => "shutdown-btn",
            Action::Update => "update-btn",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Shutdown => "Shutdown",
            Action::Update => "Update",
        }
    }

    pub fn prompt_text(self) -> &'static str {
        match self {
            Action::Shutdown => "Enter API key to shut down the host",
            Action::Update => "Enter API key to update the host",
        }
    }

    pub fn confirm_text(self) -> &'static str {
        match self {
            Action::Shutdown => "Are you sure you want to shut down the host?",
            Action::Update => "Are you sure you want to update the host? This may take a while.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shutdown" => Ok(Action::Shutdown),
            "update" => Ok(Action::Update),
            other => Err(format!("unknown action '{other}' (expected shutdown or update)")),
        }
    }
}

#[derive(Debug)]
pub enum ActionOutcome {
    /// Prompt cancelled, empty key, or confirmation declined. Nothing was sent.
    Cancelled,
    Unauthorized,
    RateLimited,
    Completed { status: StatusCode, message: String },
    Failed(ClientError),
}

/// Prompt for the credential and confirm intent. `None` means do nothing.
pub fn authorize<I: Interaction + ?Sized>(action: Action, ui: &mut I) -> Option<String> {
    let key = ui.prompt(action.prompt_text())?;
    if key.is_empty() {
        return None;
    }
    if !ui.confirm(action.confirm_text()) {
        return None;
    }
    Some(key)
}

/// Apply the status policy to a reply. 401 and 429 are decided on status
/// alone; everything else is parsed for a `message`.
pub fn classify(reply: &RawReply) -> ActionOutcome {
    match reply.status {
        StatusCode::UNAUTHORIZED => ActionOutcome::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => ActionOutcome::RateLimited,
        status => match serde_json::from_slice::<ActionReply>(&reply.body) {
            Ok(ActionReply {
                message: Some(message),
                ..
            }) => ActionOutcome::Completed { status, message },
            Ok(_) if !status.is_success() => ActionOutcome::Failed(ClientError::Status(status)),
            Ok(_) => ActionOutcome::Failed(ClientError::MissingMessage { status }),
            Err(source) => ActionOutcome::Failed(ClientError::Decode { status, source }),
        },
    }
}

/// Surface an outcome: alerts for the user, diagnostics for everything else.
pub fn settle<I: Interaction + ?Sized>(
    action: Action,
    outcome: &ActionOutcome,
    ui: &mut I,
    diag: &mut Diagnostics,
) {
    match outcome {
        ActionOutcome::Cancelled => {}
        ActionOutcome::Unauthorized => ui.notify(WRONG_API_KEY),
        ActionOutcome::RateLimited => ui.notify(TOO_MANY_REQUESTS),
        ActionOutcome::Completed { status, message } => {
            if !status.is_success() {
                diag.record(format!("{action}: server answered HTTP {status}"));
            } else {
                info!(%action, %message, "action accepted");
            }
            ui.notify(message);
        }
        ActionOutcome::Failed(err) => diag.record(format!("{action} failed: {err}")),
    }
}

/// The whole linear flow: authorize, send, classify, settle.
pub async fn perform_action<I: Interaction + ?Sized>(
    client: &ApiClient,
    action: Action,
    ui: &mut I,
    diag: &mut Diagnostics,
) -> ActionOutcome {
    let Some(key) = authorize(action, ui) else {
        return ActionOutcome::Cancelled;
    };
    let outcome = match client.post_action(action, &key).await {
        Ok(reply) => classify(&reply),
        Err(e) => ActionOutcome::Failed(e),
    };
    settle(action, &outcome, ui, diag);
    outcome
}
