//! Style definitions for the UI components.
//!
//! Every widget takes its colours from a [`Palette`] chosen by the store's
//! dark-mode flag, so toggling the theme restyles the whole frame.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::avatar::Hsl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub own_message: Color,
    pub error: Color,
}

const DARK: Palette = Palette {
    background: Color::Rgb(17, 24, 39),
    text: Color::Rgb(243, 244, 246),
    muted: Color::Rgb(156, 163, 175),
    accent: Color::Rgb(96, 165, 250),
    border: Color::Rgb(75, 85, 99),
    own_message: Color::Rgb(147, 197, 253),
    error: Color::Rgb(248, 113, 113),
};

const LIGHT: Palette = Palette {
    background: Color::Rgb(249, 250, 251),
    text: Color::Rgb(17, 24, 39),
    muted: Color::Rgb(107, 114, 128),
    accent: Color::Rgb(37, 99, 235),
    border: Color::Rgb(209, 213, 219),
    own_message: Color::Rgb(29, 78, 216),
    error: Color::Rgb(220, 38, 38),
};

pub fn palette(dark_mode: bool) -> Palette {
    if dark_mode {
        DARK
    } else {
        LIGHT
    }
}

impl Palette {
    // =========================================================================
    // Frame and panels
    // =========================================================================

    /// Base style painted under every widget.
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Border of the focused panel (accent, bold).
    pub fn active_border_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn inactive_border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Panel and screen titles.
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    /// Hints, placeholders and other secondary text.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    // =========================================================================
    // Sidebar
    // =========================================================================

    /// Highlight for the selected sidebar row.
    pub fn selected_row_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub fn section_header_style(&self) -> Style {
        Style::default()
            .fg(self.muted)
            .add_modifier(Modifier::BOLD)
    }

    // =========================================================================
    // Conversation
    // =========================================================================

    pub fn sender_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    /// Sender label on messages written by the current user.
    pub fn own_sender_style(&self) -> Style {
        Style::default()
            .fg(self.own_message)
            .add_modifier(Modifier::BOLD)
    }

    pub fn message_text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn message_time_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// "<name> is typing..." indicator (muted, italic).
    pub fn typing_style(&self) -> Style {
        Style::default()
            .fg(self.muted)
            .add_modifier(Modifier::ITALIC)
    }

    // =========================================================================
    // Status line
    // =========================================================================

    pub fn connected_style(&self) -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn disconnected_style(&self) -> Style {
        Style::default().fg(self.error)
    }
}

/// Style for an avatar badge coloured from the username hash.
pub fn avatar_style(color: Hsl) -> Style {
    let (r, g, b) = color.to_rgb();
    Style::default()
        .fg(Color::Black)
        .bg(Color::Rgb(r, g, b))
        .add_modifier(Modifier::BOLD)
}
