//! Full-frame rendering through `latchkey_tui::draw` with `TestBackend`.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend, buffer::Cell};

use latchkey_store::MemoryStore;
use latchkey_tui::{App, Palette, draw};
use latchkey_types::Route;

use crate::common::{app, mount_user, mount_user_status, start_auth_mock};

fn render(app: &App) -> (String, Terminal<TestBackend>) {
    let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
    terminal.draw(|frame| draw(frame, app)).unwrap();
    let text = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(Cell::symbol)
        .collect();
    (text, terminal)
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

#[tokio::test]
async fn signed_out_dashboard_shows_fallback() {
    let server = start_auth_mock().await;
    let mut app = app(&server, Arc::new(MemoryStore::new()));
    app.start_bootstrap();
    assert!(app.wait_for_event().await);

    let (text, _) = render(&app);
    assert!(text.contains("You need to log in to view this page."));
    assert!(text.contains("Toggle Theme (Current: light)"));
    assert!(!text.contains("Welcome"));
}

#[tokio::test]
async fn restored_session_renders_dashboard() {
    let server = start_auth_mock().await;
    mount_user(&server, "T1", "Alice").await;
    let mut app = app(&server, Arc::new(MemoryStore::with_entry("token", "T1")));
    app.start_bootstrap();
    assert!(app.wait_for_event().await);

    let (text, _) = render(&app);
    assert!(text.contains("Welcome, Alice!"));
    assert!(text.contains("signed in"));
}

#[tokio::test]
async fn login_screen_masks_password_and_shows_banner() {
    let server = start_auth_mock().await;
    mount_user_status(&server, 401).await;
    let mut app = app(&server, Arc::new(MemoryStore::with_entry("token", "stale")));
    app.start_bootstrap();
    assert!(app.wait_for_event().await);
    assert_eq!(app.route(), Route::Login);

    for c in "a@example.com".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Tab);
    for c in "secret".chars() {
        press(&mut app, KeyCode::Char(c));
    }

    let (text, _) = render(&app);
    assert!(text.contains("Your session has expired. Please log in again."));
    assert!(text.contains("a@example.com"));
    assert!(!text.contains("secret"));
    assert!(text.contains("••••••"));
}

#[tokio::test]
async fn theme_toggle_repaints_with_dark_palette() {
    let server = start_auth_mock().await;
    let mut app = app(&server, Arc::new(MemoryStore::new()));

    let (_, light) = render(&app);
    press(&mut app, KeyCode::Char('t'));
    let (text, dark) = render(&app);

    assert!(text.contains("Toggle Theme (Current: dark)"));
    let corner = |t: &Terminal<TestBackend>| t.backend().buffer().content()[0].bg;
    assert_eq!(corner(&light), Palette::light().bg);
    assert_eq!(corner(&dark), Palette::dark().bg);
}
