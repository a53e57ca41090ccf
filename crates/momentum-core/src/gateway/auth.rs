use reqwest::Method;

use super::{CallKind, Gateway};
use crate::drafts::{LoginDraft, RegisterDraft};
use crate::error::ClientError;
use crate::model::{AuthResponse, User};

impl Gateway {
    /// `POST /auth/login`. The caller persists the returned token.
    pub async fn login(&self, draft: &LoginDraft) -> Result<AuthResponse, ClientError> {
        self.send_draft(Method::POST, "/auth/login", draft, CallKind::CredentialExchange)
            .await
    }

    /// `POST /auth/register`. A duplicate email comes back as `Auth` with the server detail.
    pub async fn register(&self, draft: &RegisterDraft) -> Result<AuthResponse, ClientError> {
        self.send_draft(Method::POST, "/auth/register", draft, CallKind::CredentialExchange)
            .await
    }

    /// `GET /auth/me`
    pub async fn profile(&self) -> Result<User, ClientError> {
        self.get("/auth/me").await
    }
}
