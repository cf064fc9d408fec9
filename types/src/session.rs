//! Session state types.
//!
//! [`Session`] encodes the "a profile never exists without a token" invariant
//! in its shape: there is no variant carrying a user without a token, so no
//! code path can build one.

use serde::{Deserialize, Serialize};

use crate::{EmptyStringError, NonEmptyString};

/// Opaque bearer credential presented via the `Authorization` header.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(NonEmptyString);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        NonEmptyString::new(value).map(Self)
    }

    /// The raw token, for headers and storage only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Login request body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Manual Debug impl to prevent leaking passwords in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Profile returned by the user-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }

    /// Name to show in the UI, falling back to the email when the name is blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.email.as_deref().unwrap_or("unknown user")
        } else {
            &self.name
        }
    }
}

/// Authentication state of the running application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    /// A token is held but has not been resolved into a profile yet.
    Pending { token: BearerToken },
    Authenticated {
        token: BearerToken,
        user: UserProfile,
    },
}

impl Session {
    #[must_use]
    pub fn token(&self) -> Option<&BearerToken> {
        match self {
            Session::Anonymous => None,
            Session::Pending { token } | Session::Authenticated { token, .. } => Some(token),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            Session::Anonymous | Session::Pending { .. } => None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self {
            Session::Anonymous => SessionPhase::Anonymous,
            Session::Pending { .. } => SessionPhase::TokenPendingValidation,
            Session::Authenticated { .. } => SessionPhase::Authenticated,
        }
    }

    /// True when this session is still waiting on `token` to resolve.
    #[must_use]
    pub fn is_pending_for(&self, token: &BearerToken) -> bool {
        matches!(self, Session::Pending { token: held } if held == token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Anonymous,
    TokenPendingValidation,
    Authenticated,
}

impl SessionPhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Anonymous => "signed out",
            Self::TokenPendingValidation => "verifying",
            Self::Authenticated => "signed in",
        }
    }
}

/// One-shot notice surfaced to the UI alongside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotice {
    /// The stored or freshly issued token was rejected by the user endpoint.
    Expired,
}

impl SessionNotice {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Expired => "Your session has expired. Please log in again.",
        }
    }
}

/// What readers of the session container observe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub session: Session,
    pub notice: Option<SessionNotice>,
}
