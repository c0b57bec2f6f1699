use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::user::UserId;

/// Maximum number of core traits a character can carry.
pub const MAX_KEYWORDS: usize = 3;

/// Number of persona characters kept in the derived bio.
pub const BIO_PREFIX_CHARS: usize = 100;

/// Unique identifier for a saved character, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Create a new CharacterId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CharacterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Outcome of toggling a keyword on a [`KeywordSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordToggle {
    Added,
    Removed,
    /// The set was full and the keyword was not already selected, or the
    /// keyword was blank.
    Ignored,
}

/// Ordered set of trait keywords, capped at [`MAX_KEYWORDS`].
///
/// Insertion order is preserved for display. A 4th keyword is silently
/// ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a set from stored keywords, keeping the first occurrences
    /// and at most [`MAX_KEYWORDS`] of them. Blank entries are skipped.
    pub fn from_stored<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if !keyword.is_empty() && !set.contains(keyword) && !set.is_full() {
                set.0.push(keyword.to_string());
            }
        }
        set
    }

    /// Add the keyword if absent and under capacity, remove it if present.
    ///
    /// Keywords are trimmed first; a blank keyword is ignored.
    pub fn toggle(&mut self, keyword: &str) -> KeywordToggle {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return KeywordToggle::Ignored;
        }
        if let Some(pos) = self.0.iter().position(|k| k == keyword) {
            self.0.remove(pos);
            KeywordToggle::Removed
        } else if self.is_full() {
            KeywordToggle::Ignored
        } else {
            self.0.push(keyword.to_string());
            KeywordToggle::Added
        }
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.0.iter().any(|k| k == keyword)
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_KEYWORDS
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Trait keywords offered by the workbench.
pub const KEYWORD_SUGGESTIONS: [&str; 20] = [
    "Tsundere", "Kuudere", "Yandere", "Cheerful", "Mysterious", "Warrior", "Mage", "Thief",
    "Noble", "Outcast", "Vampire", "Werewolf", "Dragon", "Angel", "Demon", "Princess", "Knight",
    "Assassin", "Scholar", "Merchant",
];

/// The character being edited in a workbench session.
///
/// Owned by exactly one editing session and discarded with it. Nothing
/// here is persisted until an explicit save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterDraft {
    /// Absent until the first successful save, then fixed.
    pub id: Option<CharacterId>,
    pub name: String,
    pub keywords: KeywordSet,
    pub persona: String,
    pub avatar_url: Option<String>,
}

impl CharacterDraft {
    /// An empty draft, as shown when the workbench opens with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a draft from launch parameters (a name picked in the name
    /// generator, an avatar picked in the avatar maker).
    pub fn from_launch(name: Option<String>, avatar_url: Option<String>) -> Self {
        Self {
            name: name.unwrap_or_default(),
            avatar_url: avatar_url.filter(|url| !url.is_empty()),
            ..Self::default()
        }
    }

    /// Hydrate a draft from a persisted record.
    pub fn from_character(character: &Character) -> Self {
        Self {
            id: Some(character.id),
            name: character.name.clone(),
            keywords: KeywordSet::from_stored(&character.keywords),
            persona: character.persona_prompt.clone(),
            avatar_url: character.avatar_url.clone(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.persona = persona.into();
    }

    pub fn set_avatar_url(&mut self, url: impl Into<String>) {
        self.avatar_url = Some(url.into());
    }

    pub fn toggle_keyword(&mut self, keyword: &str) -> KeywordToggle {
        self.keywords.toggle(keyword)
    }

    /// Adopt the id returned by the first insert. Later calls are ignored.
    pub fn adopt_id(&mut self, id: CharacterId) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(id);
        true
    }

    /// Whether the draft has ever been saved.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether the chat tab is usable: it needs both a name and a persona.
    pub fn can_chat(&self) -> bool {
        !self.name.trim().is_empty() && !self.persona.trim().is_empty()
    }

    /// The writable fields as they would be stored, bio derived now.
    pub fn to_fields(&self) -> CharacterFields {
        CharacterFields {
            name: self.name.trim().to_string(),
            keywords: self.keywords.to_vec(),
            persona_prompt: self.persona.clone(),
            avatar_url: self.avatar_url.clone(),
            bio: derive_bio(&self.persona),
        }
    }

    /// Snapshot of the draft as an exportable character card.
    pub fn to_card(&self) -> CharacterCard {
        CharacterCard {
            name: self.name.clone(),
            keywords: self.keywords.to_vec(),
            persona: self.persona.clone(),
            avatar: self.avatar_url.clone(),
        }
    }
}

/// Derive the listing bio from a persona.
///
/// The first [`BIO_PREFIX_CHARS`] characters plus `...` when the persona
/// is longer, the persona unchanged when it fits, `None` when it is empty
/// or only whitespace.
pub fn derive_bio(persona: &str) -> Option<String> {
    if persona.trim().is_empty() {
        return None;
    }
    if persona.chars().count() <= BIO_PREFIX_CHARS {
        return Some(persona.to_string());
    }
    let prefix: String = persona.chars().take(BIO_PREFIX_CHARS).collect();
    Some(format!("{prefix}..."))
}

/// The overwritable columns of a character row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterFields {
    pub name: String,
    pub keywords: Vec<String>,
    pub persona_prompt: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// A character saved in the `characters` table.
///
/// `id`, `user_id` and `created_at` never change after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    /// Owning user.
    pub user_id: UserId,
    pub name: String,
    pub keywords: Vec<String>,
    pub persona_prompt: String,
    pub avatar_url: Option<String>,
    /// Truncated persona shown in listings.
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// Build a fresh record for insertion.
    pub fn new(user_id: UserId, fields: CharacterFields) -> Self {
        let now = Utc::now();
        Self {
            id: CharacterId::new(),
            user_id,
            name: fields.name,
            keywords: fields.keywords,
            persona_prompt: fields.persona_prompt,
            avatar_url: fields.avatar_url,
            bio: fields.bio,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable columns, leaving id, owner and creation time.
    pub fn apply(&mut self, fields: CharacterFields) {
        self.name = fields.name;
        self.keywords = fields.keywords;
        self.persona_prompt = fields.persona_prompt;
        self.avatar_url = fields.avatar_url;
        self.bio = fields.bio;
        self.updated_at = Utc::now();
    }
}

/// Exported character card (`{name}_card.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterCard {
    pub name: String,
    pub keywords: Vec<String>,
    pub persona: String,
    pub avatar: Option<String>,
}

impl CharacterCard {
    /// Download file name derived from the character name.
    pub fn file_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            "character_card.json".to_string()
        } else {
            format!("{name}_card.json")
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourth_keyword_is_ignored() {
        let mut draft = CharacterDraft::new();
        assert_eq!(draft.toggle_keyword("Warrior"), KeywordToggle::Added);
        assert_eq!(draft.toggle_keyword("Noble"), KeywordToggle::Added);
        assert_eq!(draft.toggle_keyword("Mage"), KeywordToggle::Added);
        assert_eq!(draft.toggle_keyword("Thief"), KeywordToggle::Ignored);
        assert_eq!(draft.keywords.as_slice(), ["Warrior", "Noble", "Mage"]);
    }

    #[test]
    fn toggling_selected_keyword_removes_it_even_when_full() {
        let mut set = KeywordSet::from_stored(["Warrior", "Noble", "Mage"]);
        assert_eq!(set.toggle("Noble"), KeywordToggle::Removed);
        assert_eq!(set.as_slice(), ["Warrior", "Mage"]);
        assert_eq!(set.toggle("Thief"), KeywordToggle::Added);
        assert_eq!(set.as_slice(), ["Warrior", "Mage", "Thief"]);
    }

    #[test]
    fn blank_keywords_take_no_slot() {
        let mut set = KeywordSet::new();
        assert_eq!(set.toggle(""), KeywordToggle::Ignored);
        assert_eq!(set.toggle("   "), KeywordToggle::Ignored);
        assert!(set.is_empty());
        assert_eq!(set.toggle(" Mage "), KeywordToggle::Added);
        assert_eq!(set.toggle("Mage"), KeywordToggle::Removed);
        assert!(set.is_empty());
    }

    #[test]
    fn from_stored_dedups_and_caps() {
        let set = KeywordSet::from_stored(["A", "B", "A", "C", "D"]);
        assert_eq!(set.as_slice(), ["A", "B", "C"]);
        let set = KeywordSet::from_stored(["", "A", " ", "B"]);
        assert_eq!(set.as_slice(), ["A", "B"]);
    }

    #[test]
    fn bio_truncates_long_persona() {
        let persona = "x".repeat(150);
        let bio = derive_bio(&persona).unwrap();
        assert_eq!(bio.chars().count(), BIO_PREFIX_CHARS + 3);
        assert!(bio.ends_with("..."));
    }

    #[test]
    fn bio_keeps_short_persona_and_drops_empty() {
        assert_eq!(derive_bio("A quiet scholar."), Some("A quiet scholar.".to_string()));
        assert_eq!(derive_bio("   "), None);
    }

    #[test]
    fn bio_prefix_keeps_leading_whitespace() {
        assert_eq!(derive_bio("  A quiet scholar."), Some("  A quiet scholar.".to_string()));
        let persona = format!("  {}", "x".repeat(150));
        let bio = derive_bio(&persona).unwrap();
        assert_eq!(bio, format!("  {}...", "x".repeat(BIO_PREFIX_CHARS - 2)));
    }

    #[test]
    fn bio_counts_characters_not_bytes() {
        let persona = "é".repeat(120);
        let bio = derive_bio(&persona).unwrap();
        assert_eq!(bio.trim_end_matches('.').chars().count(), BIO_PREFIX_CHARS);
    }

    #[test]
    fn adopt_id_only_once() {
        let mut draft = CharacterDraft::new();
        let first = CharacterId::new();
        assert!(draft.adopt_id(first));
        assert!(!draft.adopt_id(CharacterId::new()));
        assert_eq!(draft.id, Some(first));
    }

    #[test]
    fn launch_parameters_hydrate_name_and_avatar() {
        let draft = CharacterDraft::from_launch(Some("Aelwen".into()), Some(String::new()));
        assert_eq!(draft.name, "Aelwen");
        assert!(draft.avatar_url.is_none());
        assert!(draft.keywords.is_empty());
    }

    #[test]
    fn card_file_name_falls_back_to_character() {
        let mut draft = CharacterDraft::new();
        assert_eq!(draft.to_card().file_name(), "character_card.json");
        draft.set_name("Nyxara");
        assert_eq!(draft.to_card().file_name(), "Nyxara_card.json");
    }

    #[test]
    fn card_json_has_expected_fields() {
        let mut draft = CharacterDraft::new();
        draft.set_name("Solith");
        draft.toggle_keyword("Mage");
        draft.set_persona("A wandering mage.");
        let json = draft.to_card().to_pretty_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Solith");
        assert_eq!(value["keywords"][0], "Mage");
        assert_eq!(value["persona"], "A wandering mage.");
        assert!(value["avatar"].is_null());
        assert!(json.contains('\n'));
    }

    #[test]
    fn character_id_parses_from_display() {
        let id = CharacterId::new();
        let parsed: CharacterId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use proptest::sample::Index;

        fn keyword() -> impl Strategy<Value = String> {
            prop_oneof![
                proptest::sample::select(KEYWORD_SUGGESTIONS.to_vec()).prop_map(|k| k.to_string()),
                "\\PC{0,12}",
            ]
        }

        proptest! {
            #[test]
            fn toggling_never_exceeds_capacity(
                sequence in proptest::collection::vec(keyword(), 0..40),
            ) {
                let mut set = KeywordSet::new();
                for word in &sequence {
                    set.toggle(word);
                    prop_assert!(set.len() <= MAX_KEYWORDS);
                }
            }

            #[test]
            fn toggling_selected_keyword_always_removes_it(
                sequence in proptest::collection::vec(keyword(), 1..40),
                pick in any::<Index>(),
            ) {
                let mut set = KeywordSet::new();
                for word in &sequence {
                    set.toggle(word);
                }
                prop_assume!(!set.is_empty());

                let selected = pick.get(set.as_slice()).clone();
                let before = set.len();
                prop_assert_eq!(set.toggle(&selected), KeywordToggle::Removed);
                prop_assert!(!set.contains(&selected));
                prop_assert_eq!(set.len(), before - 1);
            }
        }
    }
}
