//! Goal management commands for CLI.

use clap::Subcommand;
use momentum_core::{Goal, GoalDraft, GoalPatch, Progress, User};
use serde::Serialize;

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum GoalAction {
    /// List goals with their progress
    List,
    /// Show one goal and its steps
    Show {
        /// Goal ID
        id: String,
    },
    /// Create a goal
    Create {
        /// Goal title
        title: String,
        /// Number of steps needed to finish
        #[arg(long)]
        total_steps: i64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Update a goal
    Update {
        /// Goal ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        total_steps: Option<i64>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        emoji: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a goal and its steps
    Delete {
        /// Goal ID
        id: String,
    },
}

/// A goal as rendered: server fields plus the locally evaluated progress.
#[derive(Serialize)]
struct GoalView<'a> {
    #[serde(flatten)]
    goal: &'a Goal,
    evaluated: Option<Progress>,
}

impl<'a> From<&'a Goal> for GoalView<'a> {
    fn from(goal: &'a Goal) -> Self {
        Self {
            goal,
            evaluated: goal.evaluate().ok(),
        }
    }
}

#[derive(Serialize)]
struct GoalListView<'a> {
    goals: Vec<GoalView<'a>>,
    /// Goals left on the free plan; absent for premium accounts.
    remaining_free_goals: Option<usize>,
    at_goal_limit: bool,
}

pub async fn run(action: GoalAction, ctx: &Context) -> CmdResult {
    match action {
        GoalAction::List => {
            let goals = ctx.call(|gw| async move { gw.list_goals().await }).await?;
            let user: User = ctx.call(|gw| async move { gw.profile().await }).await?;
            let limits = ctx.limits();

            let view = GoalListView {
                goals: goals.iter().map(GoalView::from).collect(),
                remaining_free_goals: limits.remaining_goals(&user, goals.len()),
                at_goal_limit: limits.at_goal_limit(&user, goals.len()),
            };
            ctx.emit(&view, |v| {
                if v.goals.is_empty() {
                    println!("no goals yet");
                }
                for g in &v.goals {
                    println!("{}", summary_line(g));
                }
                if v.at_goal_limit {
                    println!();
                    println!(
                        "Free plan limit of {} goals reached. Upgrade with `momentum billing subscribe`.",
                        limits.free_goal_limit
                    );
                }
            })
        }
        GoalAction::Show { id } => {
            let goal = ctx.call(|gw| async move { gw.goal(&id).await }).await?;
            ctx.emit(&GoalView::from(&goal), print_detail)
        }
        GoalAction::Create {
            title,
            total_steps,
            description,
            emoji,
            image_url,
        } => {
            let mut draft = GoalDraft::new(title, total_steps);
            draft.description = description;
            draft.emoji = emoji;
            draft.image_url = image_url;
            let goal = ctx
                .call(|gw| async move { gw.create_goal(&draft).await })
                .await?;
            ctx.emit(&GoalView::from(&goal), |v| {
                println!("Goal created: {}", v.goal.id);
            })
        }
        GoalAction::Update {
            id,
            title,
            total_steps,
            description,
            emoji,
            image_url,
        } => {
            let patch = GoalPatch {
                title,
                description,
                total_steps,
                emoji,
                image_url,
            };
            let goal = ctx
                .call(|gw| async move { gw.update_goal(&id, &patch).await })
                .await?;
            ctx.emit(&GoalView::from(&goal), |v| println!("{}", summary_line(v)))
        }
        GoalAction::Delete { id } => {
            let ack = ctx.call(|gw| async move { gw.delete_goal(&id).await }).await?;
            ctx.emit(&ack, |a| {
                if a.message.is_empty() {
                    println!("Goal deleted");
                } else {
                    println!("{}", a.message);
                }
            })
        }
    }
}

fn progress_label(progress: Option<Progress>) -> String {
    match progress {
        Some(p) => format!("{} {:>3}% {}", bar(p.percentage), p.percentage, p.tier),
        None => "(no steps planned)".to_string(),
    }
}

fn bar(percentage: u8) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(percentage.min(100)) * WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(WIDTH - filled))
}

fn summary_line(view: &GoalView<'_>) -> String {
    let goal = view.goal;
    let emoji = goal.emoji.as_deref().unwrap_or(" ");
    format!(
        "{emoji} {}  {}  {}/{}  ({})",
        goal.title,
        progress_label(view.evaluated),
        goal.completed_steps,
        goal.total_steps,
        goal.id
    )
}

fn print_detail(view: &GoalView<'_>) {
    let goal = view.goal;
    println!("{}", summary_line(view));
    if let Some(description) = goal.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  {description}");
    }
    if goal.steps.is_empty() {
        println!("  no steps");
        return;
    }
    for step in &goal.steps {
        let mark = if step.is_completed { "x" } else { " " };
        println!("  [{mark}] {}  ({})", step.title, step.id);
    }
}
