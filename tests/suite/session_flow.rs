//! End-to-end session scenarios against a stub auth service and real storage.

use std::sync::Arc;

use latchkey_store::{CredentialStore, FileStore};
use latchkey_types::{AuthError, Session, SessionNotice, SessionPhase, TOKEN_STORAGE_KEY};

use crate::common::{
    mount_login_token, mount_login_without_token, mount_user, mount_user_status,
    session_service, start_auth_mock,
};

fn file_store(dir: &tempfile::TempDir) -> Arc<FileStore> {
    Arc::new(FileStore::open(dir.path().join("credentials")).expect("open store"))
}

#[tokio::test]
async fn login_persists_token_and_restart_restores_it() {
    let server = start_auth_mock().await;
    mount_login_token(&server, "T1").await;
    mount_user(&server, "T1", "Alice").await;
    let dir = tempfile::tempdir().unwrap();

    let store = file_store(&dir);
    let sessions = session_service(&server, store.clone());
    let user = sessions.login("a@example.com", "pw").await.unwrap();
    assert_eq!(user.name, "Alice");
    match sessions.session() {
        Session::Authenticated { token, user } => {
            assert_eq!(token.expose(), "T1");
            assert_eq!(user.name, "Alice");
        }
        other => panic!("expected authenticated session, got {other:?}"),
    }
    assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap().as_deref(), Some("T1"));

    // A fresh process over the same directory.
    let restarted = session_service(&server, file_store(&dir));
    assert_eq!(restarted.session().phase(), SessionPhase::Anonymous);
    let restored = restarted.bootstrap().await.unwrap();
    assert_eq!(restored.map(|u| u.name), Some("Alice".to_string()));
    assert_eq!(restarted.session().phase(), SessionPhase::Authenticated);
}

#[tokio::test]
async fn login_without_token_changes_nothing() {
    let server = start_auth_mock().await;
    mount_login_without_token(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    let sessions = session_service(&server, store.clone());

    let err = sessions.login("a@example.com", "pw").await.unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(sessions.session(), Session::Anonymous);
    assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap(), None);
}

#[tokio::test]
async fn logout_clears_state_and_disk() {
    let server = start_auth_mock().await;
    mount_login_token(&server, "T1").await;
    mount_user(&server, "T1", "Alice").await;
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    let sessions = session_service(&server, store.clone());
    sessions.login("a@example.com", "pw").await.unwrap();

    sessions.logout();
    sessions.logout();

    assert_eq!(sessions.session(), Session::Anonymous);
    assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap(), None);
    let restarted = session_service(&server, file_store(&dir));
    assert_eq!(restarted.bootstrap().await.unwrap(), None);
}

#[tokio::test]
async fn rejected_stored_token_expires_once() {
    let server = start_auth_mock().await;
    mount_user_status(&server, 401).await;
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    store.set(TOKEN_STORAGE_KEY, "stale").unwrap();
    let sessions = session_service(&server, store.clone());

    assert_eq!(sessions.bootstrap().await, Err(AuthError::Unauthorized));

    assert_eq!(sessions.session(), Session::Anonymous);
    assert_eq!(store.get(TOKEN_STORAGE_KEY).unwrap(), None);
    assert_eq!(sessions.take_notice(), Some(SessionNotice::Expired));
    assert_eq!(sessions.take_notice(), None);
}

#[tokio::test]
async fn subscribers_observe_pending_then_authenticated() {
    let server = start_auth_mock().await;
    mount_login_token(&server, "T1").await;
    mount_user(&server, "T1", "Alice").await;
    let sessions = session_service(&server, Arc::new(latchkey_store::MemoryStore::new()));
    let mut rx = sessions.subscribe();

    let watcher = tokio::spawn(async move {
        let mut phases = Vec::new();
        while rx.changed().await.is_ok() {
            let phase = rx.borrow_and_update().session.phase();
            phases.push(phase);
            if phase == SessionPhase::Authenticated {
                break;
            }
        }
        phases
    });

    sessions.login("a@example.com", "pw").await.unwrap();
    let phases = watcher.await.unwrap();
    assert_eq!(phases.last(), Some(&SessionPhase::Authenticated));
    assert!(!phases.contains(&SessionPhase::Anonymous));
}
