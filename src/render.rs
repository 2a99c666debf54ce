//! Pure view of the chat widget.
//!
//! [`view`] reads the widget and never mutates it. The three parts of the
//! panel (trigger, response, error notice) are computed independently; an
//! error never coexists with a response because the state drops the
//! response when it enters `Error`.

use std::fmt;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde_json::Value;

use crate::state::widget::{RequestStatus, WidgetState};
use crate::widget::ChatWidget;

pub const PLACEHOLDER: &str = "Loading...";
pub const TRIGGER_LABEL: &str = "Chat with collection";
pub const BUSY_LABEL: &str = "Loading...";
pub const ERROR_NOTICE: &str = "An error occurred while fetching the response. Please try again.";

// =============================================================================
// VIEW TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetView {
    /// Shown until the widget activates, and forever if it never does.
    Placeholder,
    Ready(PanelView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub input: String,
    pub trigger: Trigger,
    /// Answer markdown rendered to plain terminal text.
    pub answer: Option<String>,
    /// References as a verbatim pretty-printed JSON dump.
    pub references: Option<String>,
    pub error_notice: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub label: &'static str,
    pub enabled: bool,
}

impl WidgetView {
    /// Whether the view currently offers an enabled trigger.
    #[must_use]
    pub fn accepts_submit(&self) -> bool {
        matches!(self, Self::Ready(panel) if panel.trigger.enabled)
    }
}

// =============================================================================
// VIEW
// =============================================================================

#[must_use]
pub fn view(widget: &ChatWidget) -> WidgetView {
    if !widget.is_active() {
        return WidgetView::Placeholder;
    }
    WidgetView::Ready(panel(widget.state()))
}

#[must_use]
pub fn panel(state: &WidgetState) -> PanelView {
    let trigger = if state.is_loading() {
        Trigger { label: BUSY_LABEL, enabled: false }
    } else {
        Trigger { label: TRIGGER_LABEL, enabled: true }
    };
    let response = state.response();

    PanelView {
        input: state.input().to_owned(),
        trigger,
        answer: response.map(|r| render_markdown(&r.answer)),
        references: response.map(|r| references_dump(&r.references)),
        error_notice: (state.status() == RequestStatus::Error).then_some(ERROR_NOTICE),
    }
}

/// Two-space indented JSON of the references, without interpretation.
/// Keys keep the order the service sent them in.
#[must_use]
pub fn references_dump(references: &[Value]) -> String {
    serde_json::to_string_pretty(references).unwrap_or_else(|e| format!("<unprintable references: {e}>"))
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str(PLACEHOLDER),
            Self::Ready(panel) => fmt::Display::fmt(panel, f),
        }
    }
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections: Vec<String> = Vec::new();
        if !self.trigger.enabled {
            sections.push(format!("[{}]", self.trigger.label));
        }
        if let Some(answer) = &self.answer {
            sections.push(answer.clone());
        }
        if let Some(references) = &self.references {
            sections.push(format!("References\n{references}"));
        }
        if let Some(notice) = self.error_notice {
            sections.push(notice.to_owned());
        }
        f.write_str(&sections.join("\n\n"))
    }
}

// =============================================================================
// MARKDOWN
// =============================================================================

/// Render answer markdown as plain terminal text.
///
/// Headings and paragraphs become blank-line separated blocks, list items
/// get `-` or `N.` markers, and links keep their target in parentheses.
/// Raw HTML from the service is dropped.
#[must_use]
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = TextWriter::default();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => out.start(tag),
            Event::End(tag) => out.end(tag),
            Event::Text(text) => out.push(&text),
            Event::Code(code) => {
                out.push("`");
                out.push(&code);
                out.push("`");
            }
            Event::SoftBreak | Event::HardBreak => out.line_break(),
            Event::Rule => {
                out.block();
                out.push("---");
            }
            Event::TaskListMarker(done) => out.push(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }
    out.finish()
}

#[derive(Default)]
struct TextWriter {
    buf: String,
    /// Next number for ordered lists, `None` for bullet lists.
    lists: Vec<Option<u64>>,
    links: Vec<String>,
}

impl TextWriter {
    fn push(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn indent(&self) -> String {
        "  ".repeat(self.lists.len().saturating_sub(1))
    }

    fn line_break(&mut self) {
        self.buf.push('\n');
        if !self.lists.is_empty() {
            let indent = self.indent();
            self.buf.push_str(&indent);
            self.buf.push_str("  ");
        }
    }

    fn start_line(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    /// Separate the next block from the previous one by a blank line.
    fn block(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        while !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph if self.lists.is_empty() => self.block(),
            // second paragraph of a loose list item
            Tag::Paragraph if !self.buf.ends_with(' ') => self.line_break(),
            Tag::Heading { .. } | Tag::CodeBlock(_) | Tag::Table(_) => self.block(),
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.block();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.start_line();
                let indent = self.indent();
                self.buf.push_str(&indent);
                match self.lists.last_mut() {
                    Some(Some(number)) => {
                        self.buf.push_str(&format!("{number}. "));
                        *number += 1;
                    }
                    _ => self.buf.push_str("- "),
                }
            }
            Tag::TableRow | Tag::TableHead => self.start_line(),
            Tag::TableCell if !self.buf.is_empty() && !self.buf.ends_with('\n') => self.push(" | "),
            Tag::Link { dest_url, .. } => self.links.push(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::Link => {
                if let Some(url) = self.links.pop().filter(|url| !url.is_empty()) {
                    self.buf.push_str(&format!(" ({url})"));
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> String {
        self.buf.trim_end().to_owned()
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
