use momentum_core::UserReward;

use super::{CmdResult, Context};

pub async fn run(ctx: &Context) -> CmdResult {
    let rewards = ctx.call(|gw| async move { gw.rewards().await }).await?;
    ctx.emit(&rewards, print_rewards)
}

fn print_rewards(rewards: &UserReward) {
    println!("Points:          {}", rewards.total_points);
    println!("Current streak:  {} days", rewards.current_streak);
    println!("Longest streak:  {} days", rewards.longest_streak);

    if rewards.badges.is_empty() {
        println!("No badges yet");
        return;
    }
    println!("Badges:");
    for badge in &rewards.badges {
        let earned = match badge.earned_at {
            Some(at) => format!("earned {}", at.format("%Y-%m-%d")),
            None => "locked".to_string(),
        };
        println!(
            "  {} {} ({}, {earned}): {}",
            badge.icon, badge.name, badge.tier, badge.description
        );
    }
}
