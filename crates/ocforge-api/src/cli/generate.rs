//! Standalone generator tools: the name generator and the avatar maker.
//!
//! Both hand their results to the workbench through `ocforge forge`
//! launch flags (`--name`, `--avatar`).

use anyhow::Result;
use console::style;

use ocforge_core::generator::{AvatarPrompt, ContentGenerator, NameStyle, Race, TagCategory};

use super::spinner;
use crate::state::AppState;

/// Generate a batch of names for a race and style.
pub async fn names(
    state: &AppState,
    race: &str,
    style_name: &str,
    count: Option<usize>,
    json: bool,
) -> Result<()> {
    let race = Race::from_name(race);
    let name_style = NameStyle::from_name(style_name);
    let count = count.unwrap_or(state.config.name_batch_size);

    let spinner = spinner("magenta", "Summoning names...");
    tokio::time::sleep(state.config.latency().names).await;
    let names = state.generator().names(race, name_style, count);
    spinner.finish_and_clear();

    if json {
        let doc = serde_json::json!({
            "race": race.to_string(),
            "style": name_style.to_string(),
            "names": names,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} {} names",
        style("✦").magenta().bold(),
        style(race).cyan(),
        style(name_style).cyan()
    );
    println!();
    for name in &names {
        println!("  {} {}", style("•").dim(), style(name).bold());
    }
    println!();
    if let Some(first) = names.first() {
        println!(
            "  Forge one: {}",
            style(format!("ocforge forge --name {first}")).yellow()
        );
        println!();
    }

    Ok(())
}

/// Generate a batch of portraits from a description and quick tags.
pub async fn avatars(
    state: &AppState,
    description: &str,
    tags: [(TagCategory, Option<String>); 3],
    count: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut prompt = AvatarPrompt::new(description);
    for (category, value) in tags {
        let Some(value) = value else { continue };
        if !prompt.toggle_tag(category, &value) {
            anyhow::bail!(
                "unknown {category} tag '{value}' (choose from: {})",
                category.options().join(", ")
            );
        }
    }
    let count = count.unwrap_or(state.config.avatar_batch_size);

    let spinner = spinner("cyan", "Painting portraits...");
    tokio::time::sleep(state.config.latency().avatar).await;
    let urls = state.generator().avatars(&prompt, count);
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&urls)?);
        return Ok(());
    }

    println!();
    for (i, url) in urls.iter().enumerate() {
        println!("  {} {}", style(format!("{}.", i + 1)).dim(), style(url).underlined());
    }
    println!();
    if let Some(first) = urls.first() {
        println!(
            "  Use one: {}",
            style(format!("ocforge forge --avatar {first}")).yellow()
        );
        println!();
    }

    Ok(())
}
