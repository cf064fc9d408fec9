//! TUI for Latchkey using ratatui.
//!
//! Two routes share one frame layout: a header carrying the theme toggle, the
//! routed screen in the middle and a status bar at the bottom. The dashboard
//! is only ever drawn through the token gate in [`views::protected`].

mod app;
mod input;
mod theme;
pub mod views;

pub use app::{App, AppEvent};
pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    text::Span,
    widgets::{Block, Paragraph},
};

use latchkey_types::Route;

const SCREEN_WIDTH: u16 = 64;
const SCREEN_HEIGHT: u16 = 11;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = app.palette();
    let glyphs = app.glyphs();
    let session = app.session();

    frame.render_widget(Block::default().style(styles::base(&palette)), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette);

    let screen = centered(chunks[1], SCREEN_WIDTH, SCREEN_HEIGHT);
    match app.route() {
        Route::Login => views::login_form::draw(
            frame,
            screen,
            app.login_form(),
            app.banner(),
            &palette,
            &glyphs,
        ),
        Route::Dashboard => {
            views::protected::draw_gated(frame, screen, &session, &palette, &glyphs, |f, area| {
                views::dashboard::draw(f, area, &session, &palette, &glyphs);
            });
        }
    }

    views::status_bar::draw(frame, chunks[2], app.route(), &session, &palette, &glyphs);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    frame.render_widget(
        Paragraph::new(Span::styled(" Latchkey", styles::key_highlight(palette))),
        area,
    );
    views::themed_button::draw(frame, area, app.theme(), palette);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
