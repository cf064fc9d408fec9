//! Token-gated rendering.
//!
//! [`gate`] is a pure function of the session: a stored token opens it, even
//! while the profile is still being fetched. The fallback never navigates on
//! its own; the caller hands in a [`Navigator`].

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use latchkey_types::{Navigator, Route, Session};

use crate::theme::{Glyphs, Palette, styles};

pub const FALLBACK_MESSAGE: &str = "You need to log in to view this page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Open,
    Closed,
}

#[must_use]
pub fn gate(session: &Session) -> Gate {
    if session.token().is_some() {
        Gate::Open
    } else {
        Gate::Closed
    }
}

/// Render `child` when the gate is open, the login prompt otherwise.
pub fn draw_gated<F>(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    palette: &Palette,
    glyphs: &Glyphs,
    child: F,
) -> Gate
where
    F: FnOnce(&mut Frame, Rect),
{
    let state = gate(session);
    match state {
        Gate::Open => child(frame, area),
        Gate::Closed => draw_fallback(frame, area, palette, glyphs),
    }
    state
}

fn draw_fallback(frame: &mut Frame, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} {FALLBACK_MESSAGE}", glyphs.locked),
            styles::base(palette),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Log in ", styles::button(palette)),
            Span::styled("  press ", styles::key_hint(palette)),
            Span::styled("l", styles::key_highlight(palette)),
            Span::styled(" or ", styles::key_hint(palette)),
            Span::styled("Enter", styles::key_highlight(palette)),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette))
        .title(" Restricted ")
        .style(styles::base(palette));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

/// Keys understood by the fallback prompt. Returns true when consumed.
pub fn handle_fallback_key(key: KeyEvent, navigator: &mut impl Navigator) -> bool {
    match key.code {
        KeyCode::Char('l') | KeyCode::Enter => {
            navigator.navigate(Route::Login);
            true
        }
        _ => false,
    }
}
