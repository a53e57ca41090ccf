//! Read-model refresh contract.
//!
//! Every mutation declares which read queries it makes stale. The gateway
//! publishes one [`Notification::Invalidated`] per declared query after the
//! mutation succeeds; view models subscribe and re-fetch on their next read.

/// A cached read the client performs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Profile,
    GoalList,
    Goal(String),
    Rewards,
}

/// A write sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateGoal,
    UpdateGoal { goal_id: String },
    DeleteGoal { goal_id: String },
    CreateStep { goal_id: String },
    UpdateStep { goal_id: String },
    DeleteStep { goal_id: String },
    ToggleStep { goal_id: String },
    Subscribe,
    CancelSubscription,
}

impl Mutation {
    pub fn invalidates(&self) -> Vec<Query> {
        match self {
            Mutation::CreateGoal => vec![Query::GoalList],
            Mutation::UpdateGoal { goal_id } | Mutation::DeleteGoal { goal_id } => {
                vec![Query::GoalList, Query::Goal(goal_id.clone())]
            }
            Mutation::CreateStep { goal_id }
            | Mutation::UpdateStep { goal_id }
            | Mutation::DeleteStep { goal_id }
            | Mutation::ToggleStep { goal_id } => vec![
                Query::GoalList,
                Query::Goal(goal_id.clone()),
                Query::Rewards,
            ],
            Mutation::Subscribe | Mutation::CancelSubscription => vec![Query::Profile],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A query's cached result is stale.
    Invalidated(Query),
    /// The signed-in user changed (login, register, logout). Drop everything.
    Reset,
    /// The server rejected the stored credential; it has been purged.
    SessionRejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_creation_only_touches_the_list() {
        assert_eq!(Mutation::CreateGoal.invalidates(), vec![Query::GoalList]);
    }

    #[test]
    fn goal_edits_touch_list_and_detail() {
        let queries = Mutation::DeleteGoal { goal_id: "g-1".into() }.invalidates();
        assert!(queries.contains(&Query::GoalList));
        assert!(queries.contains(&Query::Goal("g-1".into())));
        assert!(!queries.contains(&Query::Rewards));
    }

    #[test]
    fn step_changes_refresh_rewards() {
        let queries = Mutation::ToggleStep { goal_id: "g-1".into() }.invalidates();
        assert_eq!(
            queries,
            vec![Query::GoalList, Query::Goal("g-1".into()), Query::Rewards]
        );
    }

    #[test]
    fn billing_refreshes_profile() {
        assert_eq!(Mutation::Subscribe.invalidates(), vec![Query::Profile]);
        assert_eq!(Mutation::CancelSubscription.invalidates(), vec![Query::Profile]);
    }
}
