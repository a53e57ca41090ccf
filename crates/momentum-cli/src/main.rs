use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "momentum", version, about = "Momentum goal tracker CLI")]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// API base URL (overrides config and MOMENTUM_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log requests and session changes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out and inspect the session
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Step management
    Step {
        #[command(subcommand)]
        action: commands::step::StepAction,
    },
    /// Points, streaks and badges
    Rewards,
    /// Premium subscription
    Billing {
        #[command(subcommand)]
        action: commands::billing::BillingAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("MOMENTUM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Config { action } => commands::config::run(action, cli.json),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "momentum", &mut std::io::stdout());
            Ok(())
        }
        command => run_remote(command, cli.api_url, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Commands that talk to the API share one runtime and one session.
fn run_remote(
    command: Commands,
    api_url: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let ctx = Context::new(api_url, json)?;
        match command {
            Commands::Auth { action } => commands::auth::run(action, &ctx).await,
            Commands::Goal { action } => commands::goal::run(action, &ctx).await,
            Commands::Step { action } => commands::step::run(action, &ctx).await,
            Commands::Rewards => commands::rewards::run(&ctx).await,
            Commands::Billing { action } => commands::billing::run(action, &ctx).await,
            Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
        }
    })
}
