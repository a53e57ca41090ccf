use reqwest::Method;

use super::{segment, CallKind, Gateway, Mutation};
use crate::drafts::{StepDraft, StepPatch};
use crate::error::ClientError;
use crate::model::{Acknowledgement, Step};

fn steps_path(goal_id: &str) -> String {
    format!("/goals/{}/steps", segment(goal_id))
}

fn step_path(goal_id: &str, step_id: &str) -> String {
    format!("{}/{}", steps_path(goal_id), segment(step_id))
}

impl Gateway {
    pub async fn create_step(&self, goal_id: &str, draft: &StepDraft) -> Result<Step, ClientError> {
        let step: Step = self
            .send_draft(Method::POST, &steps_path(goal_id), draft, CallKind::Session)
            .await?;
        self.invalidate(Mutation::CreateStep {
            goal_id: goal_id.to_string(),
        });
        Ok(step)
    }

    pub async fn update_step(
        &self,
        goal_id: &str,
        step_id: &str,
        patch: &StepPatch,
    ) -> Result<Step, ClientError> {
        let step: Step = self
            .send_draft(Method::PUT, &step_path(goal_id, step_id), patch, CallKind::Session)
            .await?;
        self.invalidate(Mutation::UpdateStep {
            goal_id: goal_id.to_string(),
        });
        Ok(step)
    }

    pub async fn delete_step(
        &self,
        goal_id: &str,
        step_id: &str,
    ) -> Result<Acknowledgement, ClientError> {
        let ack = self
            .send_ack(Method::DELETE, &step_path(goal_id, step_id))
            .await?;
        self.invalidate(Mutation::DeleteStep {
            goal_id: goal_id.to_string(),
        });
        Ok(ack)
    }

    /// Flip `is_completed`. The returned step carries the server's new value;
    /// the client never predicts it.
    pub async fn toggle_step(&self, goal_id: &str, step_id: &str) -> Result<Step, ClientError> {
        let path = format!("{}/toggle", step_path(goal_id, step_id));
        let step: Step = self.send_empty(Method::PATCH, &path).await?;
        self.invalidate(Mutation::ToggleStep {
            goal_id: goal_id.to_string(),
        });
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_paths_nest_under_goal() {
        assert_eq!(steps_path("g-1"), "/goals/g-1/steps");
        assert_eq!(step_path("g-1", "s 2"), "/goals/g-1/steps/s%202");
    }
}
