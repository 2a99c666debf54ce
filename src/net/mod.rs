//! Network collaborators of the chat widget.
//!
//! DESIGN
//! ======
//! Both external capabilities sit behind `async_trait` seams so the widget
//! can be driven by mocks in tests:
//! - [`chat::ChatService`] posts a prompt and returns a [`types::ChatResponse`]
//! - [`identity::IdentityProvider`] yields the current session's tokens

pub mod chat;
pub mod identity;
pub mod types;
