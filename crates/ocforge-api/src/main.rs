//! OC Forge CLI entry point.
//!
//! Binary name: `ocforge`
//!
//! Parses CLI arguments, initializes tracing, the database and the auth
//! session, then dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use console::style;

use cli::{Cli, Commands};
use ocforge_core::generator::TagCategory;
use ocforge_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
use state::AppState;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel) {
        eprintln!("Warning: tracing setup failed: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();

    if let Err(err) = result {
        eprintln!("  {} {err:#}", style("✗").red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "ocforge", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (config, DB, session)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Names { race, style, count } => {
            cli::generate::names(&state, &race, &style, count, cli.json).await?;
        }

        Commands::Avatars {
            description,
            hair,
            eyes,
            outfit,
            count,
        } => {
            let tags = [
                (TagCategory::Hair, hair),
                (TagCategory::Eyes, eyes),
                (TagCategory::Outfit, outfit),
            ];
            cli::generate::avatars(&state, &description, tags, count, cli.json).await?;
        }

        Commands::Auth { action } => {
            cli::auth::run(&state, action, cli.json).await?;
        }

        Commands::Forge(args) => {
            cli::forge::forge(&state, args, cli.json).await?;
        }

        Commands::Show { id } => {
            cli::character::show_character(&state, &id, cli.json).await?;
        }

        Commands::List => {
            cli::character::list_characters(&state, cli.json).await?;
        }

        Commands::Delete { id, force } => {
            cli::character::delete_character(&state, &id, force, cli.json).await?;
        }

        Commands::Export { id, out } => {
            cli::character::export_character(&state, &id, &out, cli.json).await?;
        }

        Commands::Chat { id } => {
            cli::chat::loop_runner::run_chat_loop(&state, &id).await?;
        }

        Commands::Completions { .. } => unreachable!("handled before state init"),
    }

    Ok(())
}
