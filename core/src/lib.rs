//! State containers for Latchkey.
//!
//! Each container owns its state exclusively and hands out read-only views
//! through a [`tokio::sync::watch`] channel: one writer, any number of readers.
//! Consumers receive the containers explicitly (usually as an `Arc`); there is
//! no global instance.
//!
//! - [`SessionService`]: login, logout, startup restoration of a stored token
//! - [`ThemeService`]: the light/dark toggle

mod session;
mod theme;

pub use session::SessionService;
pub use theme::ThemeService;

pub use latchkey_types::{
    AuthError, BearerToken, Session, SessionNotice, SessionPhase, SessionSnapshot, Theme,
    UserProfile,
};
