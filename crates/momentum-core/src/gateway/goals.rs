use reqwest::Method;

use super::{segment, CallKind, Gateway, Mutation};
use crate::drafts::{GoalDraft, GoalPatch};
use crate::error::ClientError;
use crate::model::{Acknowledgement, Goal};

impl Gateway {
    /// `GET /goals`, in the order the server returns them.
    pub async fn list_goals(&self) -> Result<Vec<Goal>, ClientError> {
        self.get("/goals").await
    }

    /// `GET /goals/{id}`. Unknown ids are `NotFound`.
    pub async fn goal(&self, goal_id: &str) -> Result<Goal, ClientError> {
        self.get(&format!("/goals/{}", segment(goal_id))).await
    }

    pub async fn create_goal(&self, draft: &GoalDraft) -> Result<Goal, ClientError> {
        let goal: Goal = self
            .send_draft(Method::POST, "/goals", draft, CallKind::Session)
            .await?;
        self.invalidate(Mutation::CreateGoal);
        Ok(goal)
    }

    pub async fn update_goal(&self, goal_id: &str, patch: &GoalPatch) -> Result<Goal, ClientError> {
        let path = format!("/goals/{}", segment(goal_id));
        let goal: Goal = self
            .send_draft(Method::PUT, &path, patch, CallKind::Session)
            .await?;
        self.invalidate(Mutation::UpdateGoal {
            goal_id: goal_id.to_string(),
        });
        Ok(goal)
    }

    /// Deleting a goal deletes its steps with it.
    pub async fn delete_goal(&self, goal_id: &str) -> Result<Acknowledgement, ClientError> {
        let ack = self
            .send_ack(Method::DELETE, &format!("/goals/{}", segment(goal_id)))
            .await?;
        self.invalidate(Mutation::DeleteGoal {
            goal_id: goal_id.to_string(),
        });
        Ok(ack)
    }
}
