//! Theme state container: the current light/dark setting and its toggle.

use tokio::sync::watch;
use tracing::debug;

use latchkey_types::Theme;

/// Owner of the current [`Theme`]. Not persisted.
#[derive(Debug)]
pub struct ThemeService {
    state: watch::Sender<Theme>,
}

impl ThemeService {
    #[must_use]
    pub fn new(initial: Theme) -> Self {
        Self {
            state: watch::Sender::new(initial),
        }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.state.subscribe()
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let mut next = Theme::default();
        self.state.send_modify(|theme| {
            *theme = theme.toggled();
            next = *theme;
        });
        debug!(theme = %next, "Theme toggled");
        next
    }
}

impl Default for ThemeService {
    fn default() -> Self {
        Self::new(Theme::Light)
    }
}

#[cfg(test)]
mod tests {
    use super::ThemeService;
    use latchkey_types::Theme;

    #[test]
    fn starts_light() {
        assert_eq!(ThemeService::default().theme(), Theme::Light);
    }

    #[test]
    fn toggle_twice_returns_to_start() {
        let service = ThemeService::default();
        assert_eq!(service.toggle_theme(), Theme::Dark);
        assert_eq!(service.toggle_theme(), Theme::Light);
        assert_eq!(service.theme(), Theme::Light);
    }

    #[test]
    fn subscribers_see_each_toggle() {
        let service = ThemeService::default();
        let mut rx = service.subscribe();
        assert!(!rx.has_changed().unwrap());

        service.toggle_theme();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Theme::Dark);
    }
}
