//! Single-line input field rendering shared by every text box.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::text_input_state::TextInputState;

use super::styles::Palette;

const PROMPT_SYMBOL: &str = "> ";

/// What an input box shows around its text.
pub struct InputField<'a> {
    pub title: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
}

pub fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    input: &TextInputState,
    field: &InputField<'_>,
    palette: &Palette,
) {
    let border_style = if field.focused {
        palette.active_border_style()
    } else {
        palette.inactive_border_style()
    };

    let paragraph = Paragraph::new(build_input_line(input, field, palette)).block(
        Block::default()
            .title(field.title.to_owned())
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if field.focused {
        let before_cursor: String = input.text().chars().take(input.cursor_position()).collect();
        let offset = PROMPT_SYMBOL.len() + before_cursor.width();
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(offset.min(u16::MAX as usize) as u16)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
    }
}

fn build_input_line(
    input: &TextInputState,
    field: &InputField<'_>,
    palette: &Palette,
) -> Line<'static> {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), palette.muted_style());

    if input.is_empty() && !field.focused {
        return Line::from(vec![
            prompt,
            Span::styled(field.placeholder.to_owned(), palette.muted_style()),
        ]);
    }

    Line::from(vec![
        prompt,
        Span::styled(input.text().to_owned(), palette.message_text_style()),
    ])
}
