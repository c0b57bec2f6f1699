//! CLI command definitions and dispatch for the `ocforge` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `ocforge forge --name Ael`, `ocforge auth signin`).

pub mod auth;
pub mod character;
pub mod chat;
pub mod forge;
pub mod generate;
pub mod progress;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Forge original characters: names, portraits, personas and chat.
#[derive(Parser)]
#[command(name = "ocforge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true, hide = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a batch of names for a race and style.
    Names {
        /// Race: elf, orc, human, demon, dwarf, dragon.
        #[arg(short, long, default_value = "human")]
        race: String,

        /// Style: fantasy, scifi, cute, dark, noble, warrior.
        #[arg(short, long, default_value = "fantasy")]
        style: String,

        /// Number of names (defaults to `name_batch_size` from config).
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Generate a batch of placeholder portraits.
    Avatars {
        /// Free-text description of the character.
        #[arg(short, long, default_value = "")]
        description: String,

        /// Hair color tag.
        #[arg(long)]
        hair: Option<String>,

        /// Eye color tag.
        #[arg(long)]
        eyes: Option<String>,

        /// Outfit tag.
        #[arg(long)]
        outfit: Option<String>,

        /// Number of portraits (defaults to `avatar_batch_size` from config).
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Account and session management.
    Auth {
        #[command(subcommand)]
        action: auth::AuthCommand,
    },

    /// Create or edit a character in the workbench, then save it.
    Forge(forge::ForgeArgs),

    /// Show a saved character.
    Show {
        /// Character id.
        id: String,
    },

    /// List your saved characters, newest first.
    #[command(alias = "ls")]
    List,

    /// Delete a saved character.
    #[command(alias = "rm")]
    Delete {
        /// Character id.
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Export a saved character as a JSON character card.
    Export {
        /// Character id.
        id: String,

        /// Directory to write the card into.
        #[arg(short, long, default_value = ".")]
        out: std::path::PathBuf,
    },

    /// Chat with a saved character.
    Chat {
        /// Character id.
        id: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Steady-ticking spinner in the given color.
pub fn spinner(color: &str, message: impl Into<std::borrow::Cow<'static, str>>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = format!("{{spinner:.{color}}} {{msg}}");
    if let Ok(style) = ProgressStyle::default_spinner().template(&template) {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Parse a character id argument.
pub fn parse_character_id(id: &str) -> anyhow::Result<ocforge_types::character::CharacterId> {
    id.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("'{id}' is not a valid character id"))
}

/// Turn a workbench error into a user-facing message with a next step.
pub fn workbench_error(err: ocforge_types::error::WorkbenchError) -> anyhow::Error {
    if err.requires_sign_in() {
        anyhow::anyhow!("{err}. Sign in with: ocforge auth signin")
    } else {
        err.into()
    }
}

/// Same as [`workbench_error`] for dashboard errors.
pub fn dashboard_error(err: ocforge_types::error::DashboardError) -> anyhow::Error {
    match err {
        ocforge_types::error::DashboardError::AuthenticationRequired => {
            anyhow::anyhow!("{err}. Sign in with: ocforge auth signin")
        }
        other => other.into(),
    }
}
