//! # TitleBar Component
//!
//! Top status bar: thread title, message count, the current preset, the
//! timestamp of the selected message and a transient status text.
//!
//! Purely presentational. Every field is a prop set by the run loop.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar {
    pub title: String,
    pub message_count: usize,
    pub preset: String,
    /// Time of the selected message, if one is selected.
    pub selected_time: Option<String>,
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(title: String, message_count: usize, preset: String) -> Self {
        Self {
            title,
            message_count,
            preset,
            selected_time: None,
            status_message: String::new(),
            has_unseen_content: false,
        }
    }

    fn text(&self) -> String {
        let noun = if self.message_count == 1 {
            "message"
        } else {
            "messages"
        };
        let mut parts = vec![format!(
            "{} ({} {noun}, {})",
            self.title, self.message_count, self.preset
        )];
        if let Some(time) = &self.selected_time {
            parts.push(time.clone());
        }
        if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        if self.has_unseen_content {
            parts.push("↓ New".to_string());
        }
        parts.join(" | ")
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}
