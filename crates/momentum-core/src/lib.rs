//! # Momentum Core Library
//!
//! Client-side logic for the Momentum goal tracker: users create goals,
//! break them into steps, complete steps and earn badges. The server owns all
//! data; this library talks to it and interprets what comes back. The
//! `momentum` CLI is a thin layer over the same library.
//!
//! ## Key Components
//!
//! - [`Gateway`]: typed REST client; attaches the stored credential and
//!   publishes cache invalidations after mutations
//! - [`SessionManager`]: `Unknown -> Anonymous | Authenticated` lifecycle
//! - [`progress`]: completion percentage and badge tier
//! - [`ReadModel`]: cached reads refreshed through the invalidation contract
//! - [`Config`] and [`CredentialStore`]: TOML configuration and token storage

pub mod drafts;
pub mod error;
pub mod gateway;
pub mod limits;
pub mod model;
pub mod progress;
pub mod read_model;
pub mod scope;
pub mod session;
pub mod storage;

pub use drafts::{Draft, GoalDraft, GoalPatch, LoginDraft, RegisterDraft, StepDraft, StepPatch};
pub use error::{
    ClientError, ConfigError, CoreError, CredentialError, ProgressError, Result, ValidationError,
};
pub use gateway::{Gateway, Mutation, Notification, Query};
pub use limits::{PlanLimits, FREE_GOAL_LIMIT};
pub use model::{
    Acknowledgement, AuthResponse, Badge, BadgeKind, CheckoutSession, Goal, Step, User, UserReward,
};
pub use progress::{badge_tier, percentage, BadgeTier, Progress};
pub use read_model::ReadModel;
pub use scope::{ScopeGuard, ViewScope};
pub use session::{SessionManager, SessionState};
pub use storage::{
    Config, Credential, CredentialBackend, CredentialStore, FileStore, KeyringStore, MemoryStore,
};
