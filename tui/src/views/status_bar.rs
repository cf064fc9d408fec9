use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use latchkey_types::{Route, Session, SessionPhase, truncate_with_ellipsis};

use crate::theme::{Glyphs, Palette, styles};

const MAX_NAME_CHARS: usize = 24;

/// One-line footer: route, session phase and the global key hints.
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    route: Route,
    session: &Session,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let phase = session.phase();
    let (icon, icon_style) = match phase {
        SessionPhase::Authenticated => (glyphs.locked, styles::base(palette).fg(palette.success)),
        SessionPhase::TokenPendingValidation => {
            (glyphs.pending, styles::base(palette).fg(palette.warning))
        }
        SessionPhase::Anonymous => (glyphs.unlocked, styles::key_hint(palette)),
    };
    let mut spans = vec![
        Span::styled(format!(" {} ", route.title()), styles::key_highlight(palette)),
        Span::styled(format!("{icon} {}", phase.label()), icon_style),
    ];
    if let Some(user) = session.user() {
        spans.push(Span::styled(
            format!(" as {}", truncate_with_ellipsis(user.display_name(), MAX_NAME_CHARS)),
            styles::key_hint(palette),
        ));
    }
    spans.push(Span::styled("   q", styles::key_highlight(palette)));
    spans.push(Span::styled(" quit  ", styles::key_hint(palette)));
    spans.push(Span::styled("t", styles::key_highlight(palette)));
    spans.push(Span::styled(" theme", styles::key_hint(palette)));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(styles::base(palette).bg(palette.bg_panel)),
        area,
    );
}
