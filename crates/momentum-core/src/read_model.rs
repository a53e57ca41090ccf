//! Cached reads that follow the invalidation contract.
//!
//! The read model never patches cached data locally. Mutations (through any
//! clone of the gateway) publish the queries they make stale; the next read
//! of a stale query goes back to the server.

use std::collections::HashMap;

use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::error::ClientError;
use crate::gateway::{Gateway, Notification, Query};
use crate::model::{Goal, User, UserReward};

pub struct ReadModel {
    gateway: Gateway,
    notifications: broadcast::Receiver<Notification>,
    profile: Option<User>,
    goal_list: Option<Vec<Goal>>,
    goals: HashMap<String, Goal>,
    rewards: Option<UserReward>,
}

impl ReadModel {
    pub fn new(gateway: Gateway) -> Self {
        let notifications = gateway.subscribe();
        Self {
            gateway,
            notifications,
            profile: None,
            goal_list: None,
            goals: HashMap::new(),
            rewards: None,
        }
    }

    pub fn is_cached(&mut self, query: &Query) -> bool {
        self.apply_pending();
        match query {
            Query::Profile => self.profile.is_some(),
            Query::GoalList => self.goal_list.is_some(),
            Query::Goal(id) => self.goals.contains_key(id),
            Query::Rewards => self.rewards.is_some(),
        }
    }

    pub fn apply(&mut self, notification: &Notification) {
        match notification {
            Notification::Invalidated(query) => self.evict(query),
            Notification::Reset | Notification::SessionRejected => self.clear(),
        }
    }

    /// Drain notifications published since the last read.
    fn apply_pending(&mut self) {
        loop {
            match self.notifications.try_recv() {
                Ok(notification) => self.apply(&notification),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "read model lagged, dropping cache");
                    self.clear();
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn evict(&mut self, query: &Query) {
        match query {
            Query::Profile => self.profile = None,
            Query::GoalList => self.goal_list = None,
            Query::Goal(id) => {
                self.goals.remove(id);
            }
            Query::Rewards => self.rewards = None,
        }
    }

    pub fn clear(&mut self) {
        self.profile = None;
        self.goal_list = None;
        self.goals.clear();
        self.rewards = None;
    }

    pub async fn profile(&mut self) -> Result<&User, ClientError> {
        self.apply_pending();
        if self.profile.is_none() {
            self.profile = Some(self.gateway.profile().await?);
        }
        self.profile.as_ref().ok_or_else(|| ClientError::NotFound {
            detail: "Profile not found".into(),
        })
    }

    /// Goals in server order.
    pub async fn goals(&mut self) -> Result<&[Goal], ClientError> {
        self.apply_pending();
        if self.goal_list.is_none() {
            self.goal_list = Some(self.gateway.list_goals().await?);
        }
        Ok(self.goal_list.as_deref().unwrap_or_default())
    }

    pub async fn goal(&mut self, goal_id: &str) -> Result<&Goal, ClientError> {
        self.apply_pending();
        if !self.goals.contains_key(goal_id) {
            let goal = self.gateway.goal(goal_id).await?;
            self.goals.insert(goal_id.to_string(), goal);
        }
        self.goals.get(goal_id).ok_or_else(|| ClientError::NotFound {
            detail: "Goal not found".into(),
        })
    }

    pub async fn rewards(&mut self) -> Result<&UserReward, ClientError> {
        self.apply_pending();
        if self.rewards.is_none() {
            self.rewards = Some(self.gateway.rewards().await?);
        }
        self.rewards.as_ref().ok_or_else(|| ClientError::NotFound {
            detail: "Rewards not found".into(),
        })
    }
}
