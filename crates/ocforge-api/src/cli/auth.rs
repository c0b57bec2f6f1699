//! Account CLI commands: signup, signin, signout, whoami.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use dialoguer::{Input, Password};

use ocforge_core::auth::AuthProvider;
use ocforge_types::user::{Credentials, MIN_PASSWORD_LEN, Session};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Create an account and sign in.
    Signup {
        /// Account email (prompted when omitted).
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign in to an existing account.
    Signin {
        /// Account email (prompted when omitted).
        #[arg(long)]
        email: Option<String>,
    },

    /// End the current session.
    Signout,

    /// Show the signed-in account.
    Whoami,
}

pub async fn run(state: &AppState, action: AuthCommand, json: bool) -> Result<()> {
    match action {
        AuthCommand::Signup { email } => {
            let credentials = prompt_credentials(email, true)?;
            let session = state.auth.sign_up(&credentials).await?;
            print_session("Account created", &session, json)
        }
        AuthCommand::Signin { email } => {
            let credentials = prompt_credentials(email, false)?;
            let session = state.auth.sign_in(&credentials).await?;
            print_session("Signed in", &session, json)
        }
        AuthCommand::Signout => {
            let was = state.auth.current_session().await?;
            state.auth.sign_out().await?;
            if json {
                println!("{}", serde_json::json!({ "signed_out": was.is_some() }));
            } else if let Some(session) = was {
                println!(
                    "  {} Signed out of {}.",
                    style("✓").green().bold(),
                    style(&session.user.email).cyan()
                );
            } else {
                println!("  {} Not signed in.", style("i").blue().bold());
            }
            Ok(())
        }
        AuthCommand::Whoami => {
            let session = state.auth.current_session().await?;
            if json {
                let user = session.map(|s| s.user);
                println!("{}", serde_json::to_string_pretty(&user)?);
                return Ok(());
            }
            match session {
                Some(session) => println!(
                    "  {} {}",
                    style("Signed in as").bold(),
                    style(&session.user.email).cyan()
                ),
                None => println!(
                    "  {} Not signed in. Sign in with: {}",
                    style("i").blue().bold(),
                    style("ocforge auth signin").yellow()
                ),
            }
            Ok(())
        }
    }
}

/// Read credentials from flags or interactive prompts.
fn prompt_credentials(email: Option<String>, confirm: bool) -> Result<Credentials> {
    let email = match email {
        Some(e) => e,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt
            .with_prompt(format!("Password (at least {MIN_PASSWORD_LEN} characters)"))
            .with_confirmation("Confirm password", "Passwords do not match");
    }
    let password = prompt.interact()?;

    Ok(Credentials::new(email, password))
}

fn print_session(headline: &str, session: &Session, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&session.user)?);
        return Ok(());
    }

    println!();
    println!("  {} {headline}!", style("✓").green().bold());
    println!(
        "  {}  {}",
        style("Email:").bold(),
        style(&session.user.email).cyan()
    );
    println!(
        "  {}     {}",
        style("ID:").bold(),
        style(session.user.id.to_string()).dim()
    );
    println!();
    Ok(())
}
