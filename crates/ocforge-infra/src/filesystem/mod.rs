//! Filesystem helpers for OC Forge: data directory resolution and
//! character card export.

use std::path::{Path, PathBuf};

use ocforge_types::character::CharacterCard;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `OCFORGE_DATA_DIR` environment variable
/// 2. `~/.ocforge`
/// 3. `.ocforge` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OCFORGE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".ocforge");
    }

    PathBuf::from(".ocforge")
}

/// Write a character card as pretty JSON into `dir`, named after the
/// character. Path separators in the name become `_`. Returns the written path.
pub async fn write_card(dir: &Path, card: &CharacterCard) -> Result<PathBuf, std::io::Error> {
    let json = card.to_pretty_json().map_err(std::io::Error::other)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(card.file_name().replace(['/', '\\'], "_"));
    tokio::fs::write(&path, json).await?;
    tracing::info!(path = %path.display(), "exported character card");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn card(name: &str) -> CharacterCard {
        CharacterCard {
            name: name.to_string(),
            keywords: vec!["Noble".to_string()],
            persona: "A quiet noble.".to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_write_card_named_after_character() {
        let dir = tempdir().unwrap();
        let path = write_card(dir.path(), &card("Valdor")).await.unwrap();
        assert_eq!(path, dir.path().join("Valdor_card.json"));

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["name"], "Valdor");
        assert_eq!(parsed["keywords"][0], "Noble");
        assert!(written.contains('\n'));
    }

    #[tokio::test]
    async fn test_write_card_unnamed_fallback_creates_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("exports");
        let path = write_card(&nested, &card("")).await.unwrap();
        assert_eq!(path, nested.join("character_card.json"));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_write_card_name_cannot_escape_dir() {
        let dir = tempdir().unwrap();
        let path = write_card(dir.path(), &card("../Evil")).await.unwrap();
        assert_eq!(path, dir.path().join(".._Evil_card.json"));
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("OCFORGE_DATA_DIR", "/tmp/test-ocforge");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-ocforge"));
        unsafe {
            std::env::remove_var("OCFORGE_DATA_DIR");
        }
    }
}
