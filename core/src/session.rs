//! Session state container.
//!
//! # State Machine
//!
//! ```text
//!              stored token / login token
//! Anonymous ------------------------------> Pending
//!     ^                                      |   |
//!     |  resolution failed (logout)          |   | profile resolved
//!     +--------------------------------------+   v
//!     +------------------------------------ Authenticated
//!                    logout
//! ```
//!
//! `login` and `bootstrap` share a single-flight guard: while one of them is
//! resolving a token, the other is rejected with [`AuthError::Busy`].
//! `logout` never waits on the guard and never cancels an in-flight request.
//! Each logout bumps an epoch: a login whose token request straddled one
//! neither stores the token nor enters Pending, and a resolution only commits
//! if the session is still pending on the same token. Both report
//! [`AuthError::Superseded`] otherwise.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use latchkey_client::AuthClient;
use latchkey_store::CredentialStore;
use latchkey_types::{
    AuthError, BearerToken, Credentials, Session, SessionNotice, SessionSnapshot,
    TOKEN_STORAGE_KEY, UserProfile,
};

pub struct SessionService {
    client: AuthClient,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<SessionSnapshot>,
    flight: Mutex<()>,
    /// Bumped on every clear; lets a login detect a logout that raced it.
    epoch: AtomicU64,
}

impl SessionService {
    pub fn new(client: AuthClient, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            client,
            store,
            state: watch::Sender::new(SessionSnapshot::default()),
            flight: Mutex::new(()),
            epoch: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().session.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Consume the pending one-shot notice, if any.
    pub fn take_notice(&self) -> Option<SessionNotice> {
        let mut taken = None;
        self.state.send_if_modified(|snapshot| {
            taken = snapshot.notice.take();
            taken.is_some()
        });
        taken
    }

    /// Restore the session from the stored credential, if there is one.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    pub async fn bootstrap(&self) -> Result<Option<UserProfile>, AuthError> {
        let _flight = self.flight.try_lock().map_err(|_| AuthError::Busy)?;

        let stored = self.store.get(TOKEN_STORAGE_KEY).map_err(|e| {
            warn!("Failed to read stored credential: {e}");
            AuthError::Storage(e.to_string())
        })?;
        let Some(raw) = stored else {
            info!("No stored credential; starting signed out");
            return Ok(None);
        };
        let Ok(token) = BearerToken::new(raw) else {
            warn!("Stored credential is blank; discarding it");
            self.clear(None);
            return Ok(None);
        };

        debug!("Restoring session from stored credential");
        self.begin_resolution(token.clone());
        self.resolve(token).await.map(Some)
    }

    /// Exchange credentials for a session.
    ///
    /// When the login endpoint does not issue a token, or cannot be reached,
    /// the session and the stored credential are left exactly as they were.
    /// A logout that lands while the token request is in flight wins.
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<UserProfile, AuthError> {
        let _flight = self.flight.try_lock().map_err(|_| {
            debug!("Login rejected: another resolution is in flight");
            AuthError::Busy
        })?;

        let credentials = Credentials::new(email, password);
        let epoch = self.epoch.load(Ordering::Acquire);
        let token = self.client.login(&credentials).await.map_err(|e| {
            warn!(email = %credentials.email, "Login failed: {e}");
            e
        })?;
        if self.epoch.load(Ordering::Acquire) != epoch {
            debug!("Discarding issued token: logged out while signing in");
            return Err(AuthError::Superseded);
        }

        self.store
            .set(TOKEN_STORAGE_KEY, token.expose())
            .map_err(|e| {
                warn!("Failed to persist credential: {e}");
                AuthError::Storage(e.to_string())
            })?;

        let started = self.state.send_if_modified(|snapshot| {
            if self.epoch.load(Ordering::Acquire) != epoch {
                return false;
            }
            *snapshot = SessionSnapshot {
                session: Session::Pending {
                    token: token.clone(),
                },
                notice: None,
            };
            true
        });
        if !started {
            debug!("Discarding issued token: logged out while storing it");
            if let Err(e) = self.store.remove(TOKEN_STORAGE_KEY) {
                warn!("Failed to remove stored credential: {e}");
            }
            return Err(AuthError::Superseded);
        }

        info!(email = %credentials.email, "Login accepted; resolving profile");
        self.resolve(token).await
    }

    /// End the session. No network call; always succeeds and is idempotent.
    pub fn logout(&self) {
        info!("Logging out");
        self.clear(None);
    }

    fn begin_resolution(&self, token: BearerToken) {
        self.state.send_replace(SessionSnapshot {
            session: Session::Pending { token },
            notice: None,
        });
    }

    async fn resolve(&self, token: BearerToken) -> Result<UserProfile, AuthError> {
        let result = self.client.fetch_user(&token).await;

        match result {
            Ok(user) => {
                let committed = self.state.send_if_modified(|snapshot| {
                    if !snapshot.session.is_pending_for(&token) {
                        return false;
                    }
                    *snapshot = SessionSnapshot {
                        session: Session::Authenticated {
                            token: token.clone(),
                            user: user.clone(),
                        },
                        notice: None,
                    };
                    true
                });
                if !committed {
                    debug!("Discarding resolved profile: session changed meanwhile");
                    return Err(AuthError::Superseded);
                }
                info!(user = %user.display_name(), "Session authenticated");
                Ok(user)
            }
            Err(err) => {
                if !self.state.borrow().session.is_pending_for(&token) {
                    debug!("Discarding failed resolution: session changed meanwhile");
                    return Err(AuthError::Superseded);
                }
                let notice = match err {
                    AuthError::Unauthorized => {
                        warn!("Token rejected by user endpoint; session expired");
                        Some(SessionNotice::Expired)
                    }
                    ref other => {
                        warn!(ends_session = other.ends_session(), "Profile lookup failed: {other}");
                        None
                    }
                };
                self.clear(notice);
                Err(err)
            }
        }
    }

    fn clear(&self, notice: Option<SessionNotice>) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.state.send_replace(SessionSnapshot {
            session: Session::Anonymous,
            notice,
        });
        if let Err(e) = self.store.remove(TOKEN_STORAGE_KEY) {
            warn!("Failed to remove stored credential: {e}");
        }
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("base_url", &self.client.base_url().as_str())
            .field("phase", &self.state.borrow().session.phase())
            .finish_non_exhaustive()
    }
}
