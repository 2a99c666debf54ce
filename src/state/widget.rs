#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use crate::net::types::ChatResponse;

/// Lifecycle of the single chat request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Input text, last answer, and request status for one widget.
///
/// Fields are private so status only moves along the allowed transitions:
/// `Idle → Loading`, `Error → Loading`, `Loading → Idle`, `Loading → Error`.
#[derive(Clone, Debug, Default)]
pub struct WidgetState {
    input: String,
    response: Option<ChatResponse>,
    status: RequestStatus,
}

impl WidgetState {
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn response(&self) -> Option<&ChatResponse> {
        self.response.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    /// Replace the input. Kept across submissions.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Enter `Loading`. Returns `false` (and changes nothing) if a request is
    /// already in flight.
    pub fn begin_request(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.status = RequestStatus::Loading;
        true
    }

    /// Store a successful response and return to `Idle`.
    pub fn complete(&mut self, response: ChatResponse) {
        debug_assert!(self.is_loading(), "complete without begin_request");
        self.response = Some(response);
        self.status = RequestStatus::Idle;
    }

    /// Enter `Error`. The previous response is dropped so a stale answer is
    /// never shown next to the error notice.
    pub fn fail(&mut self) {
        debug_assert!(self.is_loading(), "fail without begin_request");
        self.response = None;
        self.status = RequestStatus::Error;
    }
}
