//! Free-tier presentation limits.
//!
//! These checks only decide what the client shows (upgrade notice, ads).
//! Whether the server also enforces the goal limit is not assumed either way:
//! a goal creation is always sent and the server's answer is what counts.

use crate::model::User;

/// Goals a free account can hold before the upgrade notice appears.
pub const FREE_GOAL_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub free_goal_limit: usize,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            free_goal_limit: FREE_GOAL_LIMIT,
        }
    }
}

impl PlanLimits {
    pub fn new(free_goal_limit: usize) -> Self {
        Self { free_goal_limit }
    }

    /// Whether the upgrade notice should replace the "new goal" action.
    pub fn at_goal_limit(&self, user: &User, goal_count: usize) -> bool {
        !user.is_premium && goal_count >= self.free_goal_limit
    }

    pub fn can_create_goal(&self, user: &User, goal_count: usize) -> bool {
        !self.at_goal_limit(user, goal_count)
    }

    /// Goals left before the notice, `None` for premium accounts.
    pub fn remaining_goals(&self, user: &User, goal_count: usize) -> Option<usize> {
        if user.is_premium {
            None
        } else {
            Some(self.free_goal_limit.saturating_sub(goal_count))
        }
    }

    pub fn shows_ads(&self, user: &User) -> bool {
        !user.is_premium
    }
}
