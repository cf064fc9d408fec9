//! Application state for the TUI: routing, key dispatch and the bridge
//! between async session work and the synchronous render loop.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use latchkey_core::{SessionService, ThemeService};
use latchkey_types::{
    AuthError, Navigator, Route, Session, SessionNotice, SessionSnapshot, Theme, UiOptions,
    UserProfile,
};

use crate::theme::{Glyphs, Palette, glyphs, palette};
use crate::views::{FormAction, Gate, LoginForm, gate, protected};

/// Completion of background session work, delivered back to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    LoginFinished(Result<UserProfile, AuthError>),
    BootstrapFinished(Result<Option<UserProfile>, AuthError>),
}

pub struct App {
    sessions: Arc<SessionService>,
    themes: Arc<ThemeService>,
    session_rx: watch::Receiver<SessionSnapshot>,
    theme_rx: watch::Receiver<Theme>,
    route: Route,
    login_form: LoginForm,
    banner: Option<SessionNotice>,
    options: UiOptions,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    bootstrapping: bool,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(sessions: Arc<SessionService>, themes: Arc<ThemeService>, options: UiOptions) -> Self {
        let session_rx = sessions.subscribe();
        let theme_rx = themes.subscribe();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            sessions,
            themes,
            session_rx,
            theme_rx,
            // Start on the protected screen; the gate decides what is shown.
            route: Route::Dashboard,
            login_form: LoginForm::new(),
            banner: None,
            options,
            events_tx,
            events_rx,
            bootstrapping: false,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session_rx.borrow().session.clone()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        *self.theme_rx.borrow()
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        palette(self.theme(), self.options)
    }

    #[must_use]
    pub fn glyphs(&self) -> Glyphs {
        glyphs(self.options)
    }

    #[must_use]
    pub fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    #[must_use]
    pub fn banner(&self) -> Option<&'static str> {
        self.banner.map(SessionNotice::message)
    }

    #[must_use]
    pub fn is_bootstrapping(&self) -> bool {
        self.bootstrapping
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Kick off restoration of the stored session on the runtime.
    pub fn start_bootstrap(&mut self) {
        if self.bootstrapping {
            return;
        }
        self.bootstrapping = true;
        let sessions = Arc::clone(&self.sessions);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = sessions.bootstrap().await;
            let _ = tx.send(AppEvent::BootstrapFinished(result));
        });
    }

    fn start_login(&mut self, email: String, password: String) {
        let sessions = Arc::clone(&self.sessions);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = sessions.login(email, password).await;
            let _ = tx.send(AppEvent::LoginFinished(result));
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.request_quit();
            return;
        }
        if key.code == KeyCode::F(2) {
            self.toggle_theme();
            return;
        }

        match self.route {
            Route::Login => {
                if key.code == KeyCode::Esc && self.login_form.error().is_none() {
                    self.navigate(Route::Dashboard);
                    return;
                }
                if let FormAction::Submit(credentials) = self.login_form.handle_key(key) {
                    self.banner = None;
                    self.start_login(credentials.email, credentials.password);
                }
            }
            Route::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.request_quit(),
            KeyCode::Char('t') => self.toggle_theme(),
            _ => match gate(&self.session()) {
                Gate::Closed => {
                    protected::handle_fallback_key(key, self);
                }
                Gate::Open => {
                    if key.code == KeyCode::Char('o') {
                        self.sessions.logout();
                        self.navigate(Route::Login);
                    }
                }
            },
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.route == Route::Login {
            self.login_form.paste(text);
        }
    }

    fn toggle_theme(&mut self) {
        let theme = self.themes.toggle_theme();
        debug!(%theme, "Theme toggled from UI");
    }

    /// Apply finished background work and session notices. Call once per frame.
    pub fn tick(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
        self.check_notice();
    }

    /// Wait for the next background completion and apply it.
    ///
    /// Returns false when no sender remains.
    pub async fn wait_for_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply_event(event);
                self.check_notice();
                true
            }
            None => false,
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoginFinished(result) => {
                self.login_form.finish(result.as_ref().map(|_| ()));
                match result {
                    Ok(user) => {
                        info!(user = %user.display_name(), "Signed in");
                        self.navigate(Route::Dashboard);
                    }
                    Err(AuthError::Busy) => {
                        self.login_form
                            .set_error("Still checking your session. Try again in a moment.");
                    }
                    Err(err) => debug!("Login did not complete: {err}"),
                }
            }
            AppEvent::BootstrapFinished(result) => {
                self.bootstrapping = false;
                match result {
                    Ok(Some(user)) => info!(user = %user.display_name(), "Session restored"),
                    Ok(None) => debug!("No session to restore"),
                    Err(err) => warn!("Session restore failed: {err}"),
                }
            }
        }
    }

    fn check_notice(&mut self) {
        if let Some(notice) = self.sessions.take_notice() {
            self.banner = Some(notice);
            self.navigate(Route::Login);
        }
    }
}

impl Navigator for App {
    fn navigate(&mut self, route: Route) {
        if self.route != route {
            debug!(from = ?self.route, to = ?route, "Navigate");
            self.route = route;
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("route", &self.route)
            .field("theme", &self.theme())
            .field("bootstrapping", &self.bootstrapping)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}
