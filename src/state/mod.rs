//! Client-side state owned by the chat widget.

pub mod widget;
