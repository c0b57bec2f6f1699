//! Main chat loop: open the character, print a banner, then read lines
//! until EOF, `/exit`, or the session ending.

use console::style;
use rustyline_async::{Readline, ReadlineEvent};

use ocforge_core::auth::AuthProvider;
use ocforge_types::chat::ChatRole;

use super::commands::{self, ChatCommand};
use crate::cli::{parse_character_id, spinner, workbench_error};
use crate::state::{AppState, ConcreteWorkbench};

/// Run the interactive chat loop for a saved character.
pub async fn run_chat_loop(state: &AppState, id: &str) -> anyhow::Result<()> {
    let id = parse_character_id(id)?;
    let mut workbench = state.open_workbench(&id).await.map_err(workbench_error)?;

    if !workbench.draft().can_chat() {
        anyhow::bail!(
            "'{}' needs a name and a persona before chatting. Add one with: ocforge forge --id {id}",
            workbench.draft().name
        );
    }

    let name = workbench.draft().name.clone();
    print_banner(&workbench);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut rl, _writer) = Readline::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut session = state.auth.subscribe();
    let mut signed_out = false;

    loop {
        let event = tokio::select! {
            biased;
            changed = session.changed() => {
                if changed.is_err() || session.borrow_and_update().is_none() {
                    signed_out = true;
                    break;
                }
                continue;
            }
            event = rl.readline() => event,
        };

        let line = match event {
            Ok(ReadlineEvent::Line(line)) => line.trim().to_string(),
            Ok(ReadlineEvent::Interrupted) => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            Ok(ReadlineEvent::Eof) | Err(_) => break,
        };

        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line.clone());

        if let Some(command) = commands::parse(&line) {
            match command {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => {
                    let _ = rl.clear();
                }
                ChatCommand::Exit => break,
                ChatCommand::History => print_history(&workbench),
                ChatCommand::Persona => {
                    println!();
                    println!("  {}", style(&workbench.draft().persona).dim());
                    println!();
                }
                ChatCommand::SignOut => state.auth.sign_out().await?,
                ChatCommand::Unknown(name) => println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let typing = spinner("cyan", format!("{name} is typing..."));
        let reply = workbench.send_chat_message(&line).await;
        typing.finish_and_clear();

        if let Some(reply) = reply {
            println!();
            println!("  {} {}", style(format!("{name} >")).cyan().bold(), reply);
            println!();
        }
    }

    let _ = rl.flush();
    if signed_out {
        println!(
            "\n  {} Signed out. Sign in again with: {}",
            style("i").blue().bold(),
            style("ocforge auth signin").yellow()
        );
    }
    println!(
        "\n  {} ({} exchange{})",
        style("Chat ended.").dim(),
        workbench.chat().turn_count(),
        if workbench.chat().turn_count() == 1 { "" } else { "s" }
    );
    Ok(())
}

fn print_banner(workbench: &ConcreteWorkbench) {
    let draft = workbench.draft();
    println!();
    println!("  {}", style(&draft.name).cyan().bold());
    if !draft.keywords.is_empty() {
        println!("  {}", style(draft.keywords.as_slice().join(" · ")).magenta());
    }
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

fn print_history(workbench: &ConcreteWorkbench) {
    let messages = workbench.chat().messages();
    println!();
    if messages.is_empty() {
        println!("  {}", style("(no messages yet)").dim());
    }
    for message in messages {
        let label = match message.role {
            ChatRole::User => format!("{}", style("You").green()),
            ChatRole::Assistant => format!("{}", style(&workbench.draft().name).cyan()),
        };
        println!("  {} {}", style(label).bold(), message.content);
    }
    println!();
}
