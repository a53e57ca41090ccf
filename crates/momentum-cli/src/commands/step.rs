use clap::Subcommand;
use momentum_core::{Step, StepDraft, StepPatch};

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum StepAction {
    /// Add a step to a goal
    Add {
        /// Goal ID
        goal_id: String,
        /// Step title
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a step
    Update {
        goal_id: String,
        step_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Set completion explicitly instead of toggling
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a step
    Delete { goal_id: String, step_id: String },
    /// Flip a step between done and not done
    Toggle { goal_id: String, step_id: String },
}

pub async fn run(action: StepAction, ctx: &Context) -> CmdResult {
    match action {
        StepAction::Add {
            goal_id,
            title,
            description,
        } => {
            let mut draft = StepDraft::new(title);
            draft.description = description;
            let step = ctx
                .call(|gw| async move { gw.create_step(&goal_id, &draft).await })
                .await?;
            ctx.emit(&step, |s| println!("Step added: {}", s.id))
        }
        StepAction::Update {
            goal_id,
            step_id,
            title,
            description,
            completed,
        } => {
            let patch = StepPatch {
                title,
                description,
                is_completed: completed,
            };
            let step = ctx
                .call(|gw| async move { gw.update_step(&goal_id, &step_id, &patch).await })
                .await?;
            ctx.emit(&step, print_step)
        }
        StepAction::Delete { goal_id, step_id } => {
            let ack = ctx
                .call(|gw| async move { gw.delete_step(&goal_id, &step_id).await })
                .await?;
            ctx.emit(&ack, |_| println!("Step deleted"))
        }
        StepAction::Toggle { goal_id, step_id } => {
            let step = ctx
                .call(|gw| async move { gw.toggle_step(&goal_id, &step_id).await })
                .await?;
            ctx.emit(&step, print_step)
        }
    }
}

fn print_step(step: &Step) {
    let state = if step.is_completed { "done" } else { "open" };
    println!("[{state}] {}  ({})", step.title, step.id);
}
