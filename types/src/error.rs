use thiserror::Error;

/// Failure outcomes of session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The login endpoint did not issue a token.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// The user endpoint rejected the token.
    #[error("session is no longer authorized")]
    Unauthorized,
    #[error("could not reach the authentication service: {0}")]
    Transport(String),
    /// A login or bootstrap resolution is already in flight.
    #[error("another sign-in is already in progress")]
    Busy,
    /// The session changed while the resolution was in flight; its result was dropped.
    #[error("session changed before the profile arrived")]
    Superseded,
    #[error("could not save credentials: {0}")]
    Storage(String),
}

impl AuthError {
    /// Whether this failure ends the current session (as opposed to leaving it untouched).
    #[must_use]
    pub const fn ends_session(&self) -> bool {
        matches!(self, AuthError::Unauthorized | AuthError::Transport(_))
    }
}
