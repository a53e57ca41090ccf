use clap::Subcommand;

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum BillingAction {
    /// Start a premium checkout
    Subscribe {
        /// Open the checkout page in the browser
        #[arg(long)]
        open: bool,
    },
    /// Cancel the premium subscription
    Cancel,
}

pub async fn run(action: BillingAction, ctx: &Context) -> CmdResult {
    match action {
        BillingAction::Subscribe { open } => {
            let checkout = ctx
                .call(|gw| async move { gw.subscribe_checkout().await })
                .await?;
            if open {
                if let Err(e) = open::that(&checkout.checkout_url) {
                    tracing::warn!(error = %e, "could not open browser");
                }
            }
            ctx.emit(&checkout, |c| {
                println!("Complete your upgrade at:");
                println!("  {}", c.checkout_url);
            })
        }
        BillingAction::Cancel => {
            let ack = ctx
                .call(|gw| async move { gw.cancel_subscription().await })
                .await?;
            ctx.emit(&ack, |a| {
                if a.message.is_empty() {
                    println!("Subscription cancelled");
                } else {
                    println!("{}", a.message);
                }
            })
        }
    }
}
