//! Placeholder portrait URLs and the avatar maker's quick tags.

use std::fmt;

pub const HAIR_COLORS: [&str; 8] = [
    "Black", "Brown", "Blonde", "Red", "White", "Blue", "Purple", "Green",
];

pub const EYE_COLORS: [&str; 8] = [
    "Brown", "Blue", "Green", "Amber", "Purple", "Red", "Gold", "Silver",
];

pub const OUTFITS: [&str; 8] = [
    "Armor", "Robe", "Casual", "Royal", "Ninja", "Cyberpunk", "Victorian", "Tribal",
];

/// Edge length in pixels of generated portraits.
const PORTRAIT_SIZE: u32 = 400;

/// Quick-tag category in the avatar maker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    Hair,
    Eyes,
    Outfit,
}

impl TagCategory {
    pub fn options(self) -> &'static [&'static str] {
        match self {
            TagCategory::Hair => &HAIR_COLORS,
            TagCategory::Eyes => &EYE_COLORS,
            TagCategory::Outfit => &OUTFITS,
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagCategory::Hair => write!(f, "hair"),
            TagCategory::Eyes => write!(f, "eyes"),
            TagCategory::Outfit => write!(f, "outfit"),
        }
    }
}

/// What the user asked the avatar maker for.
///
/// Each category holds at most one tag. The placeholder image service
/// ignores all of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarPrompt {
    pub description: String,
    pub hair: Option<String>,
    pub eyes: Option<String>,
    pub outfit: Option<String>,
}

impl AvatarPrompt {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Select `value` in `category`, or clear it if it is already selected.
    ///
    /// Values not offered for the category (matched case-insensitively)
    /// are ignored and `false` is returned.
    pub fn toggle_tag(&mut self, category: TagCategory, value: &str) -> bool {
        let Some(canonical) = category
            .options()
            .iter()
            .find(|option| option.eq_ignore_ascii_case(value.trim()))
        else {
            return false;
        };

        let slot = match category {
            TagCategory::Hair => &mut self.hair,
            TagCategory::Eyes => &mut self.eyes,
            TagCategory::Outfit => &mut self.outfit,
        };
        if slot.as_deref() == Some(*canonical) {
            *slot = None;
        } else {
            *slot = Some(canonical.to_string());
        }
        true
    }
}

/// Portrait URL for a seed: `{base}/seed/{seed}/400/400`.
pub fn avatar_url(base_url: &str, seed: &str) -> String {
    format!(
        "{}/seed/{seed}/{PORTRAIT_SIZE}/{PORTRAIT_SIZE}",
        base_url.trim_end_matches('/')
    )
}

/// `count` portrait URLs sharing `seed`, suffixed 1..=count.
pub fn avatar_batch(base_url: &str, seed: u64, count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| avatar_url(base_url, &format!("{seed}{i}")))
        .collect()
}
