use std::io::BufRead;

use clap::Subcommand;
use momentum_core::{LoginDraft, RegisterDraft, SessionState, User};

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored credential
    Logout,
    /// Check the stored credential against the server
    Status,
    /// Show the signed-in account
    Whoami,
}

pub async fn run(action: AuthAction, ctx: &Context) -> CmdResult {
    match action {
        AuthAction::Login { email, password } => {
            let password = password_or_stdin(password)?;
            let user = ctx
                .session
                .login(&LoginDraft::new(email, password))
                .await
                .map_err(user_facing)?;
            ctx.emit(&user, |u| println!("signed in as {} <{}>", u.username, u.email))
        }
        AuthAction::Register {
            email,
            username,
            password,
        } => {
            let password = password_or_stdin(password)?;
            let user = ctx
                .session
                .register(&RegisterDraft::new(email, password, username))
                .await
                .map_err(user_facing)?;
            ctx.emit(&user, |u| println!("account created, signed in as {}", u.username))
        }
        AuthAction::Logout => {
            ctx.session.logout();
            ctx.emit(&SessionState::Anonymous, |_| println!("signed out"))
        }
        AuthAction::Status => {
            let state = ctx.session.resolve().await;
            ctx.emit(&state, |s| match s.user() {
                Some(u) => println!("authenticated as {}", u.username),
                None => println!("not authenticated"),
            })
        }
        AuthAction::Whoami => {
            ctx.require_login()?;
            let user = ctx.session.refresh_profile().await.map_err(|e| e.user_message())?;
            ctx.emit(&user, print_user)
        }
    }
}

fn print_user(user: &User) {
    println!("{} <{}>", user.username, user.email);
    println!("  id:      {}", user.id);
    println!("  plan:    {}", if user.is_premium { "premium" } else { "free" });
    println!("  joined:  {}", user.created_at.format("%Y-%m-%d"));
}

fn password_or_stdin(password: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    if line.is_empty() {
        return Err("password required (--password or stdin)".into());
    }
    Ok(line)
}

fn user_facing(e: momentum_core::CoreError) -> String {
    match e {
        momentum_core::CoreError::Client(e) => e.user_message(),
        other => other.to_string(),
    }
}
