//! Typed boundary to the Momentum REST API.
//!
//! The gateway shapes requests, attaches the stored credential and maps
//! responses onto [`ClientError`]. It holds no business logic. Operations are
//! grouped by resource in the submodules; all of them are `impl Gateway`.
//!
//! ## Error mapping
//!
//! | Response                              | Error                       |
//! |---------------------------------------|-----------------------------|
//! | no response                           | `Network`                   |
//! | 2xx with an undecodable body          | `Api { status, .. }`        |
//! | 4xx on login/register                 | `Auth`                      |
//! | 401 on any other call                 | `Auth` + credential purged  |
//! | 404                                   | `NotFound`                  |
//! | other non-2xx                         | `Api { status, detail }`    |

mod auth;
mod goals;
pub mod invalidation;
mod payments;
mod rewards;
mod steps;

pub use invalidation::{Mutation, Notification, Query};

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use url::Url;

use crate::drafts::Draft;
use crate::error::{ClientError, ValidationError};
use crate::model::Acknowledgement;
use crate::storage::{Config, CredentialStore};

const NOTIFICATION_CAPACITY: usize = 64;

/// How a call relates to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    /// login/register: a 4xx means rejected credentials or a conflict, not a dead session.
    CredentialExchange,
    /// Everything else.
    Session,
}

#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    notifications: broadcast::Sender<Notification>,
}

impl Gateway {
    /// Gateway for `base_url` using the HTTP client's default timeout.
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ClientError> {
        Self::build(base_url, credentials, None)
    }

    /// Gateway for the configured API. `base_url` overrides both the file and
    /// `MOMENTUM_API_URL`.
    pub fn from_config(
        config: &Config,
        base_url: Option<&str>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, ClientError> {
        let base_url = match base_url {
            Some(url) => url.to_string(),
            None => config.api_base_url(),
        };
        Self::build(
            &base_url,
            credentials,
            config.api.timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ValidationError::Invalid {
            field: "base_url",
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::Invalid {
                field: "base_url",
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            }
            .into());
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            notifications,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Receive invalidation and session notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    pub(crate) fn publish(&self, notification: Notification) {
        // No subscribers is fine.
        let _ = self.notifications.send(notification);
    }

    fn invalidate(&self, mutation: Mutation) {
        for query in mutation.invalidates() {
            self.publish(Notification::Invalidated(query));
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request, attaching the bearer token when one is stored.
    ///
    /// Returns whether a token was attached.
    fn request(&self, method: Method, path: &str) -> (RequestBuilder, bool) {
        tracing::debug!(%method, path, "api request");
        let builder = self.http.request(method, self.url(path));
        match self.credentials.load() {
            Ok(Some(credential)) => (builder.bearer_auth(&credential.token), true),
            Ok(None) => (builder, false),
            Err(e) => {
                tracing::warn!(error = %e, "credential store unreadable, sending without token");
                (builder, false)
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let (req, authed) = self.request(Method::GET, path);
        let resp = self.dispatch(req, authed, CallKind::Session).await?;
        decode(resp).await
    }

    /// Validate `body`, then send it.
    async fn send_draft<T: DeserializeOwned, D: Draft>(
        &self,
        method: Method,
        path: &str,
        body: &D,
        kind: CallKind,
    ) -> Result<T, ClientError> {
        body.validate()?;
        let (req, authed) = self.request(method, path);
        let resp = self.dispatch(req.json(body), authed, kind).await?;
        decode(resp).await
    }

    /// Bodyless write.
    async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ClientError> {
        let (req, authed) = self.request(method, path);
        let resp = self.dispatch(req, authed, CallKind::Session).await?;
        decode(resp).await
    }

    /// Bodyless write whose response body is informational only.
    async fn send_ack(&self, method: Method, path: &str) -> Result<Acknowledgement, ClientError> {
        let (req, authed) = self.request(method, path);
        let resp = self.dispatch(req, authed, CallKind::Session).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    async fn dispatch(
        &self,
        req: RequestBuilder,
        authed: bool,
        kind: CallKind,
    ) -> Result<Response, ClientError> {
        let resp = req.send().await?;
        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "api response");
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);

        match (status, kind) {
            (status, CallKind::CredentialExchange) if status.is_client_error() => {
                Err(ClientError::Auth { detail })
            }
            (StatusCode::UNAUTHORIZED, CallKind::Session) => {
                if authed {
                    self.reject_session();
                }
                Err(ClientError::Auth { detail })
            }
            (StatusCode::NOT_FOUND, _) => Err(ClientError::NotFound { detail }),
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            }),
        }
    }

    /// The server refused the stored token: purge it and tell subscribers.
    fn reject_session(&self) {
        tracing::warn!("server rejected the stored credential, purging it");
        if let Err(e) = self.credentials.clear() {
            tracing::warn!(error = %e, "failed to purge rejected credential");
        }
        self.publish(Notification::SessionRejected);
    }
}

/// A body that arrives but does not parse is the server's fault, not the
/// connection's.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status().as_u16();
    let body = resp.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "undecodable response body");
        ClientError::Api {
            status,
            detail: "Unexpected response from the server".to_string(),
        }
    })
}

/// Human-readable detail from an error body.
///
/// Understands `{"detail": "..."}` and validation lists
/// `{"detail": [{"msg": "..."}]}`; anything else gets a generic fallback.
pub(crate) fn error_detail(status: StatusCode, body: &str) -> String {
    let fallback = || format!("Request failed with status {}", status.as_u16());
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };
    match &json["detail"] {
        serde_json::Value::String(s) if !s.is_empty() => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| item["msg"].as_str())
            .map(str::to_string)
            .unwrap_or_else(fallback),
        _ => fallback(),
    }
}

fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}
