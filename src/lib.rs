//! # collection-chat
//!
//! Terminal client for asking questions about a document collection. A
//! single [`widget::ChatWidget`] resolves its configuration from the
//! environment, obtains an identity token, posts the prompt to the remote
//! chat service, and keeps the last answer with its references for display.
//!
//! The `ChatService` and `IdentityProvider` traits are the seams to the two
//! external collaborators; tests replace both with mocks.

pub mod config;
pub mod net;
pub mod render;
pub mod state;
pub mod widget;
