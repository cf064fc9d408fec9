use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use latchkey_types::Session;

use crate::theme::{Glyphs, Palette, styles};

/// Greeting for the signed-in user. Only drawn behind the token gate.
pub fn draw(frame: &mut Frame, area: Rect, session: &Session, palette: &Palette, glyphs: &Glyphs) {
    let mut lines = Vec::new();
    match session.user() {
        Some(user) => {
            lines.push(Line::from(Span::styled(
                format!("Welcome, {}!", user.display_name()),
                styles::focused_field(palette),
            )));
            if let Some(email) = user.email.as_deref() {
                lines.push(Line::from(Span::styled(
                    format!("{} {email}", glyphs.bullet),
                    styles::key_hint(palette),
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            format!("Loading profile{}", glyphs.pending),
            styles::key_hint(palette),
        ))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Logout ", styles::button(palette)),
        Span::styled("  press ", styles::key_hint(palette)),
        Span::styled("o", styles::key_highlight(palette)),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette))
        .title(" Dashboard ")
        .padding(Padding::horizontal(1))
        .style(styles::base(palette));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
