//! Chat widget controller: activation and the submit state machine.
//!
//! DESIGN
//! ======
//! The widget is built inactive and activated once from a configuration
//! result. A failed resolution leaves it `Unconfigured` for good; later
//! `activate` calls are ignored. Once active, `submit` runs one linear
//! sequence (token lookup, then one POST) and records the outcome in the
//! [`WidgetState`].
//!
//! ERROR HANDLING
//! ==============
//! Nothing here returns an error to the host. Every failure on the submit
//! path is logged and ends in [`RequestStatus::Error`]; configuration
//! failures end in the inactive placeholder.

use std::sync::Arc;

use url::Url;

use crate::config::{AuthConfig, ConfigError, IdentityPool, WidgetConfig};
use crate::net::chat::{ChatError, ChatService};
use crate::net::identity::{IdentityError, IdentityProvider, acquire_token};
use crate::net::types::ChatResponse;
use crate::state::widget::{RequestStatus, WidgetState};

// =============================================================================
// TYPES
// =============================================================================

enum Activation {
    /// `activate` has not been called yet.
    Pending,
    /// Configuration was incomplete; terminal.
    Unconfigured,
    Active(ActiveWidget),
}

struct ActiveWidget {
    endpoint: Url,
    /// `None` in anonymous mode.
    identity: Option<Arc<dyn IdentityProvider>>,
}

/// What a call to [`ChatWidget::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The widget is not activated; nothing happened.
    Inactive,
    /// A request is already in flight; nothing happened.
    Busy,
    /// A response was stored and status is back to `Idle`.
    Answered,
    /// Status is now `Error`.
    Failed,
}

#[derive(Debug, thiserror::Error)]
enum SubmitError {
    #[error("user is not properly authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Chat(#[from] ChatError),
}

// =============================================================================
// WIDGET
// =============================================================================

pub struct ChatWidget {
    activation: Activation,
    service: Arc<dyn ChatService>,
    state: WidgetState,
}

impl ChatWidget {
    /// Build an inactive widget that will talk to `service` once activated.
    #[must_use]
    pub fn new(service: Arc<dyn ChatService>) -> Self {
        Self { activation: Activation::Pending, service, state: WidgetState::default() }
    }

    /// Activate from a configuration-resolution result. Only the first call
    /// has any effect. `connect_identity` is called with the pool ids when
    /// the config requires authentication.
    ///
    /// Returns whether the widget is active afterwards.
    pub fn activate<F>(&mut self, config: Result<WidgetConfig, ConfigError>, connect_identity: F) -> bool
    where
        F: FnOnce(&IdentityPool) -> Arc<dyn IdentityProvider>,
    {
        if !matches!(self.activation, Activation::Pending) {
            tracing::debug!("activate ignored: already attempted");
            return self.is_active();
        }

        self.activation = match config {
            Err(e) => {
                tracing::error!(error = %e, "required configuration is not defined; chat stays disabled");
                Activation::Unconfigured
            }
            Ok(config) => {
                let identity = match &config.auth {
                    AuthConfig::IdentityPool(pool) => Some(connect_identity(pool)),
                    AuthConfig::Anonymous => None,
                };
                tracing::info!(
                    endpoint = %config.chat_endpoint,
                    authenticated = identity.is_some(),
                    "chat widget activated"
                );
                Activation::Active(ActiveWidget { endpoint: config.chat_endpoint, identity })
            }
        };
        self.is_active()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.activation, Activation::Active(_))
    }

    /// Resolved chat endpoint, present only once active.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Url> {
        match &self.activation {
            Activation::Active(active) => Some(&active.endpoint),
            Activation::Pending | Activation::Unconfigured => None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    #[must_use]
    pub fn status(&self) -> RequestStatus {
        self.state.status()
    }

    /// Replace the input text. Ignored while inactive.
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state.set_input(text);
        true
    }

    /// Send the current input to the chat service.
    ///
    /// Refused while inactive or while a request is in flight. Any failure
    /// (no token, transport, non-success status, unparseable body) leaves
    /// the widget in `Error` with no response stored. A non-success status
    /// is a failure even when its body is valid JSON.
    ///
    /// Dropping the returned future before it resolves also ends in
    /// `Error`, so the widget never stays `Loading`.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Activation::Active(active) = &self.activation else {
            tracing::warn!("submit ignored: chat widget is not activated");
            return SubmitOutcome::Inactive;
        };
        if !self.state.begin_request() {
            tracing::debug!("submit ignored: request already in flight");
            return SubmitOutcome::Busy;
        }

        let prompt = self.state.input().to_owned();
        let in_flight = InFlight { state: Some(&mut self.state) };

        tracing::info!(prompt_len = prompt.len(), "submitting prompt");
        match exchange(active, self.service.as_ref(), &prompt).await {
            Ok(response) => {
                tracing::info!(
                    session_id = %response.session_id,
                    references = response.references.len(),
                    "answer received"
                );
                in_flight.complete(response);
                SubmitOutcome::Answered
            }
            Err(e) => {
                tracing::error!(error = %e, "chat request failed");
                in_flight.fail();
                SubmitOutcome::Failed
            }
        }
    }

    /// End the identity session. No-op in anonymous mode or while inactive.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`IdentityError`] if sign-out fails.
    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        match &self.activation {
            Activation::Active(ActiveWidget { identity: Some(identity), .. }) => identity.sign_out().await,
            _ => Ok(()),
        }
    }

    /// Name of the signed-in user, when the session carries one.
    pub async fn username(&self) -> Option<String> {
        let Activation::Active(ActiveWidget { identity: Some(identity), .. }) = &self.activation else {
            return None;
        };
        match identity.fetch_session().await {
            Ok(session) => session.tokens?.username(),
            Err(e) => {
                tracing::debug!(error = %e, "no session for greeting");
                None
            }
        }
    }
}

/// Borrow of the state for one request. Dropped unresolved, it moves the
/// state to `Error`.
struct InFlight<'a> {
    state: Option<&'a mut WidgetState>,
}

impl InFlight<'_> {
    fn complete(mut self, response: ChatResponse) {
        if let Some(state) = self.state.take() {
            state.complete(response);
        }
    }

    fn fail(mut self) {
        if let Some(state) = self.state.take() {
            state.fail();
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::warn!("chat request abandoned before completion");
            state.fail();
        }
    }
}

async fn exchange(active: &ActiveWidget, service: &dyn ChatService, prompt: &str) -> Result<ChatResponse, SubmitError> {
    let token = match &active.identity {
        Some(identity) => Some(
            acquire_token(identity.as_ref())
                .await
                .ok_or(SubmitError::NotAuthenticated)?,
        ),
        None => None,
    };
    Ok(service.chat(&active.endpoint, token.as_deref(), prompt).await?)
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
