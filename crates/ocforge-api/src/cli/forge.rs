//! `ocforge forge`: the workbench as a one-shot command.
//!
//! Flags edit the draft directly; anything left unspecified is prompted for
//! when running interactively. The command ends with a save.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::{Input, MultiSelect};

use ocforge_core::event::WorkbenchEvents;
use ocforge_types::character::{CharacterDraft, KEYWORD_SUGGESTIONS, KeywordToggle, MAX_KEYWORDS};

use super::progress::track;
use super::{parse_character_id, workbench_error};
use crate::state::{AppState, ConcreteWorkbench};

#[derive(Args)]
pub struct ForgeArgs {
    /// Edit a saved character instead of starting a new one.
    #[arg(long)]
    pub id: Option<String>,

    /// Character name.
    #[arg(long)]
    pub name: Option<String>,

    /// Replace the name with a random one.
    #[arg(long, conflicts_with = "name")]
    pub random_name: bool,

    /// Toggle a trait keyword (repeatable, at most 3 are kept).
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Persona text.
    #[arg(long)]
    pub persona: Option<String>,

    /// Generate the persona from the selected keywords.
    #[arg(long, conflicts_with = "persona")]
    pub generate_persona: bool,

    /// Portrait URL (e.g. one picked with `ocforge avatars`).
    #[arg(long)]
    pub avatar: Option<String>,

    /// Generate a new portrait.
    #[arg(long, conflicts_with = "avatar")]
    pub generate_avatar: bool,

    /// Never prompt; use only what the flags provide.
    #[arg(long)]
    pub no_input: bool,

    /// Also write the character card into this directory after saving.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub async fn forge(state: &AppState, args: ForgeArgs, json: bool) -> Result<()> {
    let interactive = !args.no_input && !json;

    let mut workbench = match &args.id {
        Some(id) => {
            let id = parse_character_id(id)?;
            let mut workbench = state.open_workbench(&id).await.map_err(workbench_error)?;
            if let Some(name) = &args.name {
                workbench.set_name(name.clone());
            }
            if let Some(url) = &args.avatar {
                workbench.set_avatar_url(url.clone());
            }
            workbench
        }
        None => state.workbench(CharacterDraft::from_launch(
            args.name.clone(),
            args.avatar.clone(),
        )),
    };

    let mut events = workbench.subscribe();

    identity(&mut workbench, &args, interactive)?;
    traits(&mut workbench, &args.keywords, interactive)?;
    persona(&mut workbench, &mut events, &args, interactive).await?;
    portrait(&mut workbench, &mut events, args.generate_avatar).await;

    let outcome = track(&mut events, workbench.save())
        .await
        .map_err(workbench_error)?;

    let exported = match &args.export {
        Some(dir) => Some(ocforge_infra::filesystem::write_card(dir, &workbench.export_snapshot()).await?),
        None => None,
    };

    if json {
        let doc = serde_json::json!({
            "created": outcome.created,
            "character": outcome.character,
            "card": exported,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let character = &outcome.character;
    println!();
    println!(
        "  {} Character {}!",
        style("✓").green().bold(),
        if outcome.created { "created" } else { "updated" }
    );
    println!();
    println!("  {}      {}", style("Name:").bold(), style(&character.name).cyan());
    if !character.keywords.is_empty() {
        println!("  {}    {}", style("Traits:").bold(), character.keywords.join(", "));
    }
    if let Some(bio) = &character.bio {
        println!("  {}       {}", style("Bio:").bold(), style(bio).dim());
    }
    if let Some(url) = &character.avatar_url {
        println!("  {}    {}", style("Avatar:").bold(), style(url).underlined());
    }
    println!("  {}        {}", style("ID:").bold(), style(character.id.to_string()).dim());
    if let Some(path) = exported {
        println!("  {}      {}", style("Card:").bold(), path.display());
    }
    println!();
    println!(
        "  Chat with them: {}",
        style(format!("ocforge chat {}", character.id)).yellow()
    );
    println!();

    Ok(())
}

fn identity(workbench: &mut ConcreteWorkbench, args: &ForgeArgs, interactive: bool) -> Result<()> {
    if args.random_name {
        let name = workbench.randomize_name().to_string();
        tracing::debug!(%name, "randomized name");
    } else if interactive && args.name.is_none() && workbench.draft().name.is_empty() {
        let name = Input::<String>::new()
            .with_prompt("Character name")
            .allow_empty(true)
            .interact_text()?;
        workbench.set_name(name);
    }
    Ok(())
}

fn traits(workbench: &mut ConcreteWorkbench, keywords: &[String], interactive: bool) -> Result<()> {
    for keyword in keywords {
        if keyword.trim().is_empty() {
            continue;
        }
        if workbench.toggle_keyword(keyword) == KeywordToggle::Ignored {
            eprintln!(
                "  {} Only {MAX_KEYWORDS} traits can be selected; '{keyword}' was skipped.",
                style("!").yellow().bold()
            );
        }
    }

    if interactive && keywords.is_empty() && workbench.draft().keywords.is_empty() {
        let picked = MultiSelect::new()
            .with_prompt(format!("Pick up to {MAX_KEYWORDS} traits (space to select)"))
            .items(&KEYWORD_SUGGESTIONS)
            .interact()?;
        for index in picked {
            workbench.toggle_keyword(KEYWORD_SUGGESTIONS[index]);
        }
    }
    Ok(())
}

async fn persona(
    workbench: &mut ConcreteWorkbench,
    events: &mut WorkbenchEvents,
    args: &ForgeArgs,
    interactive: bool,
) -> Result<()> {
    if let Some(text) = &args.persona {
        workbench.set_persona(text.clone());
        return Ok(());
    }

    let wants_generation = args.generate_persona
        || (interactive && workbench.draft().persona.is_empty() && !workbench.draft().keywords.is_empty());
    if wants_generation {
        if !track(events, workbench.generate_persona()).await {
            eprintln!(
                "  {} Select at least one trait to generate a persona.",
                style("!").yellow().bold()
            );
        }
    }

    if interactive {
        let edited = Input::<String>::new()
            .with_prompt("Persona")
            .with_initial_text(workbench.draft().persona.clone())
            .allow_empty(true)
            .interact_text()?;
        workbench.set_persona(edited);
    }
    Ok(())
}

async fn portrait(workbench: &mut ConcreteWorkbench, events: &mut WorkbenchEvents, generate: bool) {
    if !generate {
        return;
    }
    let url = track(events, workbench.generate_avatar()).await.map(str::to_string);
    tracing::debug!(url = ?url, "generated portrait");
}
