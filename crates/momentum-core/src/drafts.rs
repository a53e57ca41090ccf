//! Typed drafts for every form that talks to the API.
//!
//! A draft is filled in completely and then validated as a single step
//! before submission. The gateway calls [`Draft::validate`] itself, so an
//! invalid draft never produces a network request.

use serde::Serialize;
use url::Url;

use crate::error::ValidationError;

/// A request body that can be checked before it is sent.
pub trait Draft: Serialize {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

fn require_total_steps(value: i64) -> Result<(), ValidationError> {
    if value < 1 {
        return Err(ValidationError::OutOfRange {
            field: "total_steps",
            min: 1,
            value,
        });
    }
    Ok(())
}

fn require_image_url(value: &str) -> Result<(), ValidationError> {
    let invalid = |message: String| ValidationError::Invalid {
        field: "image_url",
        message,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn require_email(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::Invalid {
        field: "email",
        message: "expected an address like name@example.com".into(),
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Blank { field: "email" });
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || value.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(())
}

fn require_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Blank { field: "password" });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total_steps: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl GoalDraft {
    pub fn new(title: impl Into<String>, total_steps: i64) -> Self {
        Self {
            title: title.into(),
            description: None,
            total_steps,
            emoji: None,
            image_url: None,
        }
    }
}

impl Draft for GoalDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_total_steps(self.total_steps)?;
        if let Some(url) = &self.image_url {
            require_image_url(url)?;
        }
        Ok(())
    }
}

/// Partial goal update. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl GoalPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.total_steps.is_none()
            && self.emoji.is_none()
            && self.image_url.is_none()
    }
}

impl Draft for GoalPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(total) = self.total_steps {
            require_total_steps(total)?;
        }
        if let Some(url) = &self.image_url {
            require_image_url(url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StepDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }
}

impl Draft for StepDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl Draft for StepPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_none() && self.description.is_none() && self.is_completed.is_none() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

impl LoginDraft {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for LoginDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginDraft")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Draft for LoginDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_email(&self.email)?;
        require_password(&self.password)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegisterDraft {
    pub email: String,
    pub password: String,
    pub username: String,
}

impl RegisterDraft {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            username: username.into(),
        }
    }
}

impl std::fmt::Debug for RegisterDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterDraft")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

impl Draft for RegisterDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require_email(&self.email)?;
        require_password(&self.password)?;
        require_text("username", &self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_draft_requires_title() {
        let draft = GoalDraft::new("   ", 3);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Blank { field: "title" })
        );
    }

    #[test]
    fn goal_draft_requires_at_least_one_step() {
        let draft = GoalDraft::new("Learn Rust", 0);
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::OutOfRange { field: "total_steps", value: 0, .. })
        ));
    }

    #[test]
    fn goal_draft_checks_image_url() {
        let mut draft = GoalDraft::new("Learn Rust", 3);
        draft.image_url = Some("not a url".into());
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::Invalid { field: "image_url", .. })
        ));

        draft.image_url = Some("ftp://example.com/a.png".into());
        assert!(draft.validate().is_err());

        draft.image_url = Some("https://example.com/a.png".into());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn goal_draft_omits_absent_fields() {
        let json = serde_json::to_value(GoalDraft::new("Learn Rust", 3)).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Learn Rust", "total_steps": 3}));
    }

    #[test]
    fn empty_patches_are_rejected() {
        assert_eq!(GoalPatch::default().validate(), Err(ValidationError::EmptyPatch));
        assert_eq!(StepPatch::default().validate(), Err(ValidationError::EmptyPatch));
    }

    #[test]
    fn goal_patch_validates_present_fields() {
        let patch = GoalPatch {
            total_steps: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = GoalPatch {
            emoji: Some("🎯".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn step_patch_can_only_toggle_completion() {
        let patch = StepPatch {
            is_completed: Some(true),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"is_completed": true})
        );
    }

    #[test]
    fn login_draft_checks_email_shape() {
        assert!(LoginDraft::new("ana@example.com", "pw").validate().is_ok());
        assert!(LoginDraft::new("ana.example.com", "pw").validate().is_err());
        assert!(LoginDraft::new("@example.com", "pw").validate().is_err());
        assert!(LoginDraft::new("ana@", "pw").validate().is_err());
        assert!(LoginDraft::new("a@b@c", "pw").validate().is_err());
        assert_eq!(
            LoginDraft::new("ana@example.com", "").validate(),
            Err(ValidationError::Blank { field: "password" })
        );
    }

    #[test]
    fn register_draft_requires_username() {
        let draft = RegisterDraft::new("ana@example.com", "pw", " ");
        assert_eq!(
            draft.validate(),
            Err(ValidationError::Blank { field: "username" })
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let draft = LoginDraft::new("ana@example.com", "hunter2");
        assert!(!format!("{draft:?}").contains("hunter2"));
    }
}
