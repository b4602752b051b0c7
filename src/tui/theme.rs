//! Terminal styles built from the message palette.

use ratatui::style::{Color, Modifier, Style};

use crate::core::color::{self, Color as PaletteColor};
use crate::core::font::FontStyle;

pub fn rgb(color: PaletteColor) -> Color {
    let (r, g, b) = color.to_rgb8();
    Color::Rgb(r, g, b)
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub incoming: Style,
    pub outgoing: Style,
    pub internal: Style,
    pub header: Style,
    pub label: Style,
    pub cell_top_label: Style,
    pub mention: Style,
    pub avatar: Style,
    pub play_button: Style,
    pub placeholder: Style,
    pub selected_border: Style,
    pub typing: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            incoming: Style::default()
                .fg(rgb(color::DARK_GREY))
                .bg(rgb(color::INCOMING_GRAY)),
            outgoing: Style::default()
                .fg(rgb(color::DARK_GREY))
                .bg(rgb(color::OUTGOING_GREEN)),
            internal: Style::default()
                .fg(rgb(color::DARK_GREY))
                .bg(rgb(color::INTERNAL_MESSAGE_BACKGROUND)),
            header: Style::default()
                .fg(rgb(color::MESSAGING_LIGHT_GRAY))
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(rgb(color::MESSAGING_LIGHT_GRAY)),
            cell_top_label: Style::default()
                .fg(rgb(color::MESSAGING_LIGHT_GRAY))
                .add_modifier(Modifier::BOLD),
            mention: Style::default()
                .fg(rgb(color::ROYAL_BLUE))
                .add_modifier(Modifier::BOLD),
            avatar: Style::default()
                .fg(rgb(color::GLOBAL_TINT))
                .bg(rgb(color::C2C_BLUE)),
            play_button: Style::default()
                .fg(rgb(color::DARK_GREY))
                .bg(rgb(color::PLAY_BUTTON_LIGHT_GRAY)),
            placeholder: Style::default()
                .fg(rgb(color::MESSAGING_LIGHT_GRAY))
                .add_modifier(Modifier::DIM),
            selected_border: Style::default().fg(rgb(color::PRIVATE_CHAT_MODE)),
            typing: Style::default()
                .fg(rgb(color::MESSAGING_LIGHT_GRAY))
                .add_modifier(Modifier::ITALIC),
        }
    }
}

impl Theme {
    /// Bubble style for a message.
    pub fn bubble(&self, is_outgoing: bool, is_internal: bool) -> Style {
        if is_internal {
            self.internal
        } else if is_outgoing {
            self.outgoing
        } else {
            self.incoming
        }
    }
}

/// Weight and slant of `font` as terminal modifiers.
pub fn font_modifiers(font: FontStyle) -> Modifier {
    let mut modifier = Modifier::empty();
    if font.is_bold() {
        modifier |= Modifier::BOLD;
    }
    if font.is_italic() {
        modifier |= Modifier::ITALIC;
    }
    if font.is_light() {
        modifier |= Modifier::DIM;
    }
    modifier
}
