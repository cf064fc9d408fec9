use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use latchkey_types::Theme;

use crate::theme::{Palette, styles};

#[must_use]
pub fn label(theme: Theme) -> String {
    format!("Toggle Theme (Current: {theme})")
}

/// Draws the toggle button right-aligned in `area` and returns the cells it covers.
pub fn draw(frame: &mut Frame, area: Rect, theme: Theme, palette: &Palette) -> Rect {
    let text = format!(" {} ", label(theme));
    let width = (text.width() as u16).min(area.width);
    let button = Rect {
        x: area.right().saturating_sub(width),
        y: area.y,
        width,
        height: area.height.min(1),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, styles::button(palette))))
            .alignment(Alignment::Right),
        button,
    );
    button
}
