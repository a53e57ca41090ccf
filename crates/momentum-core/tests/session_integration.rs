//! Session lifecycle against a mocked API.

mod support;

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use mockito::Matcher;
use momentum_core::{
    ClientError, CoreError, Credential, CredentialStore, LoginDraft, MemoryStore, Notification,
    RegisterDraft, SessionManager, SessionState,
};
use support::*;

fn manager(url: &str, store: Arc<MemoryStore>) -> SessionManager {
    SessionManager::new(gateway(url, store))
}

#[tokio::test]
async fn starts_unknown_until_resolved() {
    let session = manager("http://127.0.0.1:9", Arc::new(MemoryStore::new()));
    assert!(session.state().is_pending());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn resolve_without_credential_skips_network() {
    let mut server = mockito::Server::new_async().await;
    let me = server.mock("GET", "/auth/me").expect(0).create_async().await;

    let session = manager(&server.url(), Arc::new(MemoryStore::new()));
    assert_eq!(session.resolve().await, SessionState::Anonymous);

    me.assert_async().await;
}

#[tokio::test]
async fn resolve_restores_stored_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .match_header("authorization", bearer().as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("u-1", true).to_string())
        .create_async()
        .await;

    let session = manager(&server.url(), signed_in_store());
    let state = session.resolve().await;

    assert!(state.is_authenticated());
    let user = session.user().unwrap();
    assert_eq!(user.id, "u-1");
    assert!(user.is_premium);
}

#[tokio::test]
async fn resolve_purges_rejected_credential() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(401)
        .with_body(r#"{"detail":"Could not validate credentials"}"#)
        .create_async()
        .await;

    let store = signed_in_store();
    let session = manager(&server.url(), store.clone());

    assert_eq!(session.resolve().await, SessionState::Anonymous);
    assert!(store.fetch().unwrap().is_none());
}

#[tokio::test]
async fn resolve_purges_on_any_profile_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(500)
        .create_async()
        .await;

    let store = signed_in_store();
    let session = manager(&server.url(), store.clone());

    assert_eq!(session.resolve().await, SessionState::Anonymous);
    assert!(store.fetch().unwrap().is_none());
}

#[tokio::test]
async fn expired_credential_is_never_sent() {
    let mut server = mockito::Server::new_async().await;
    let me = server.mock("GET", "/auth/me").expect(0).create_async().await;

    let stale = Credential {
        token: TOKEN.into(),
        token_type: "bearer".into(),
        expires_at: Utc::now() - Duration::minutes(1),
    };
    let store = Arc::new(MemoryStore::with(stale));
    let session = manager(&server.url(), store.clone());

    assert_eq!(session.resolve().await, SessionState::Anonymous);
    assert!(store.fetch().unwrap().is_none());
    me.assert_async().await;
}

#[tokio::test]
async fn login_persists_credential_for_a_week() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(auth_json("fresh-token").to_string())
        .create_async()
        .await;

    let store = Arc::new(MemoryStore::new());
    let session = manager(&server.url(), store.clone());
    let mut notifications = session.gateway().subscribe();
    session.resolve().await;

    let user = session
        .login(&LoginDraft::new("ana@example.com", "secret"))
        .await
        .unwrap();

    assert_eq!(user.username, "ana");
    assert_eq!(session.state(), SessionState::Authenticated(user));

    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.token, "fresh-token");
    let ttl = stored.expires_at - Utc::now();
    assert!(ttl > Duration::days(7) - Duration::minutes(1));
    assert!(ttl <= Duration::days(7));

    assert_eq!(notifications.try_recv().unwrap(), Notification::Reset);
}

#[tokio::test]
async fn failed_login_changes_nothing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"detail":"Incorrect email or password"}"#)
        .create_async()
        .await;

    let store = Arc::new(MemoryStore::new());
    let session = manager(&server.url(), store.clone());
    session.resolve().await;

    let err = session
        .login(&LoginDraft::new("ana@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Client(ClientError::Auth { .. })));
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(store.fetch().unwrap().is_none());
}

#[tokio::test]
async fn invalid_login_draft_is_rejected_locally() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/auth/login")
        .expect(0)
        .create_async()
        .await;

    let session = manager(&server.url(), Arc::new(MemoryStore::new()));
    let err = session
        .login(&LoginDraft::new("not-an-email", "secret"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Client(ClientError::Validation(_))));
    login.assert_async().await;
}

#[tokio::test]
async fn register_signs_in() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/register")
        .match_body(Matcher::Json(serde_json::json!({
            "email": "ana@example.com",
            "password": "secret",
            "username": "ana"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(auth_json("new-token").to_string())
        .create_async()
        .await;

    let store = Arc::new(MemoryStore::new());
    let session = manager(&server.url(), store.clone());
    session
        .register(&RegisterDraft::new("ana@example.com", "secret", "ana"))
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert_eq!(store.load().unwrap().unwrap().token, "new-token");
}

#[tokio::test]
async fn logout_is_local_and_idempotent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("u-1", false).to_string())
        .create_async()
        .await;

    let store = signed_in_store();
    let session = manager(&server.url(), store.clone());
    session.resolve().await;
    let mut notifications = session.gateway().subscribe();

    session.logout();
    session.logout();

    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(store.fetch().unwrap().is_none());
    assert_eq!(notifications.try_recv().unwrap(), Notification::Reset);
    assert!(notifications.try_recv().is_err());
}

#[tokio::test]
async fn observers_see_transitions() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("u-1", false).to_string())
        .create_async()
        .await;

    let session = manager(&server.url(), signed_in_store());
    let mut rx = session.subscribe();
    assert!(rx.borrow_and_update().is_pending());

    session.resolve().await;
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_authenticated());

    session.logout();
    assert_eq!(*rx.borrow_and_update(), SessionState::Anonymous);
}

#[tokio::test]
async fn guarded_call_expires_rejected_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("u-1", false).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/goals")
        .with_status(401)
        .with_body(r#"{"detail":"Token expired"}"#)
        .create_async()
        .await;

    let store = signed_in_store();
    let session = manager(&server.url(), store.clone());
    session.resolve().await;
    assert!(session.is_authenticated());

    let err = session
        .authorized(|gw| async move { gw.list_goals().await })
        .await
        .unwrap_err();

    assert!(err.is_session_rejected());
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(store.fetch().unwrap().is_none());
}

#[tokio::test]
async fn unguarded_rejection_is_tracked() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("u-1", false).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/rewards")
        .with_status(401)
        .create_async()
        .await;

    let session = Arc::new(manager(&server.url(), signed_in_store()));
    session.resolve().await;
    let tracker = session.track_rejections();
    let mut rx = session.subscribe();
    rx.borrow_and_update();

    let gw = session.gateway().clone();
    assert!(gw.rewards().await.is_err());

    tokio::time::timeout(StdDuration::from_secs(5), rx.changed())
        .await
        .expect("session state did not change")
        .unwrap();
    assert_eq!(*rx.borrow(), SessionState::Anonymous);

    drop(rx);
    drop(gw);
    tracker.abort();
}

#[tokio::test]
async fn refresh_profile_picks_up_premium() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json("u-1", true).to_string())
        .create_async()
        .await;

    let session = manager(&server.url(), signed_in_store());
    let user = session.refresh_profile().await.unwrap();

    assert!(user.is_premium);
    assert_eq!(session.user(), Some(user));
}
