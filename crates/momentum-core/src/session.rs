//! Session manager.
//!
//! Owns the authenticated-user lifecycle and all credential I/O. One manager
//! is constructed per process and handed to whatever needs it; there is no
//! global "current user".
//!
//! ## State Transitions
//!
//! ```text
//! Unknown --resolve--> Authenticated(user) | Anonymous
//! Anonymous --login/register--> Authenticated(user)
//! Authenticated --logout / rejected credential--> Anonymous
//! ```
//!
//! Readers can [`subscribe`](SessionManager::subscribe) to the state and see
//! `Unknown` while resolution is pending.

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::drafts::{LoginDraft, RegisterDraft};
use crate::error::{ClientError, CoreError};
use crate::gateway::{Gateway, Notification};
use crate::model::{AuthResponse, User};
use crate::storage::Credential;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "lowercase")]
pub enum SessionState {
    /// The stored credential has not been checked yet.
    Unknown,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Unknown)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

pub struct SessionManager {
    gateway: Gateway,
    state: watch::Sender<SessionState>,
    ttl: Duration,
}

impl SessionManager {
    /// Default lifetime of a persisted credential.
    pub const DEFAULT_TTL_DAYS: i64 = 7;

    /// New manager in the `Unknown` state. Call [`resolve`](Self::resolve) next.
    pub fn new(gateway: Gateway) -> Self {
        Self::with_ttl(gateway, Duration::days(Self::DEFAULT_TTL_DAYS))
    }

    pub fn with_ttl(gateway: Gateway, ttl: Duration) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self { gateway, state, ttl }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Check the persisted credential against the server.
    ///
    /// No credential: `Anonymous`. Profile fetch succeeds: `Authenticated`.
    /// Profile fetch fails for any reason: the credential is purged and the
    /// state is `Anonymous`.
    pub async fn resolve(&self) -> SessionState {
        self.transition(SessionState::Unknown);

        let credential = match self.gateway.credentials().load() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!(error = %e, "credential store unreadable, treating as signed out");
                None
            }
        };

        let next = match credential {
            None => SessionState::Anonymous,
            Some(_) => match self.gateway.profile().await {
                Ok(user) => SessionState::Authenticated(user),
                Err(e) => {
                    tracing::warn!(error = %e, "stored session could not be restored");
                    self.purge_credential();
                    SessionState::Anonymous
                }
            },
        };
        self.transition(next.clone());
        next
    }

    /// Sign in. On failure neither the state nor the stored credential change.
    pub async fn login(&self, draft: &LoginDraft) -> Result<User, CoreError> {
        let response = self.gateway.login(draft).await?;
        self.establish(response)
    }

    /// Create an account and sign in. Same all-or-nothing rules as `login`.
    pub async fn register(&self, draft: &RegisterDraft) -> Result<User, CoreError> {
        let response = self.gateway.register(draft).await?;
        self.establish(response)
    }

    fn establish(&self, response: AuthResponse) -> Result<User, CoreError> {
        let credential = Credential::issue(response.access_token, response.token_type, self.ttl);
        self.gateway.credentials().save(&credential)?;
        tracing::info!(user_id = %response.user.id, "signed in");
        self.transition(SessionState::Authenticated(response.user.clone()));
        self.gateway.publish(Notification::Reset);
        Ok(response.user)
    }

    /// Sign out locally. Never touches the network and never fails.
    pub fn logout(&self) {
        self.purge_credential();
        if self.transition(SessionState::Anonymous) {
            tracing::info!("signed out");
            self.gateway.publish(Notification::Reset);
        }
    }

    /// Re-fetch the signed-in user, e.g. after a billing change.
    pub async fn refresh_profile(&self) -> Result<User, ClientError> {
        let user = self.authorized(|gw| async move { gw.profile().await }).await?;
        self.transition(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    /// Interpret the result of an authenticated call.
    ///
    /// A rejected session moves the manager to `Anonymous` and purges the
    /// stored credential; the error is passed through unchanged.
    pub fn guard<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(e) = &result {
            if e.is_session_rejected() {
                self.expire();
            }
        }
        result
    }

    /// Run a gateway call through [`guard`](Self::guard).
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<T, ClientError>
    where
        F: FnOnce(Gateway) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let result = call(self.gateway.clone()).await;
        self.guard(result)
    }

    /// Expire the session whenever any gateway clone reports a rejected
    /// credential, including calls that bypass [`guard`](Self::guard).
    ///
    /// The task ends once the manager is dropped.
    pub fn track_rejections(self: &Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.gateway.subscribe();
        let manager = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(Notification::SessionRejected) => match manager.upgrade() {
                        Some(manager) => manager.expire(),
                        None => break,
                    },
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        if manager.strong_count() == 0 {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn expire(&self) {
        self.purge_credential();
        if self.transition(SessionState::Anonymous) {
            tracing::warn!("session rejected by server, signed out");
        }
    }

    fn purge_credential(&self) {
        if let Err(e) = self.gateway.credentials().clear() {
            tracing::warn!(error = %e, "failed to clear stored credential");
        }
    }

    /// Returns whether the state actually changed.
    fn transition(&self, next: SessionState) -> bool {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "email": "ana@example.com",
            "username": "ana",
            "is_premium": false,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(SessionState::Anonymous).unwrap();
        assert_eq!(json, serde_json::json!({"state": "anonymous"}));

        let json = serde_json::to_value(SessionState::Authenticated(user())).unwrap();
        assert_eq!(json["state"], "authenticated");
        assert_eq!(json["user"]["username"], "ana");
    }

    #[test]
    fn only_authenticated_has_a_user() {
        assert!(SessionState::Unknown.user().is_none());
        assert!(SessionState::Anonymous.user().is_none());
        assert_eq!(SessionState::Authenticated(user()).user(), Some(&user()));
    }

    #[test]
    fn transition_reports_changes_only() {
        let gateway = Gateway::new("http://localhost:8000", Arc::new(MemoryStore::new())).unwrap();
        let session = SessionManager::new(gateway);

        assert!(session.transition(SessionState::Anonymous));
        assert!(!session.transition(SessionState::Anonymous));
        assert!(session.transition(SessionState::Authenticated(user())));
    }
}
