//! Name tables and the race × style name generator.

use rand::Rng;

use std::fmt;

/// Prefixes used by the workbench "randomize name" button.
const WORKBENCH_PREFIXES: [&str; 8] = ["Aer", "Val", "Kyr", "Nyx", "Sol", "Lun", "Vor", "Zeph"];

/// Suffixes used by the workbench "randomize name" button.
const WORKBENCH_SUFFIXES: [&str; 8] = ["iel", "wyn", "dor", "ara", "ith", "eon", "ris", "vex"];

/// Character race, selecting the name prefix table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Race {
    Elf,
    Orc,
    #[default]
    Human,
    Demon,
    Dwarf,
    Dragon,
}

impl Race {
    pub const ALL: [Race; 6] = [
        Race::Elf,
        Race::Orc,
        Race::Human,
        Race::Demon,
        Race::Dwarf,
        Race::Dragon,
    ];

    /// Parse a race name. Unknown names fall back to [`Race::Human`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "elf" => Race::Elf,
            "orc" => Race::Orc,
            "human" => Race::Human,
            "demon" => Race::Demon,
            "dwarf" => Race::Dwarf,
            "dragon" => Race::Dragon,
            other => {
                tracing::debug!(race = other, "unknown race, using human");
                Race::default()
            }
        }
    }

    fn prefixes(self) -> &'static [&'static str] {
        match self {
            Race::Elf => &["Ael", "Lar", "Syl", "Ith", "Ean", "Vor", "Thal", "Nym", "Cel", "Rin"],
            Race::Orc => &["Grok", "Thrak", "Morg", "Krag", "Druk", "Brak", "Garn", "Thog", "Ruk", "Zog"],
            Race::Human => &["Ald", "Bran", "Cor", "Dav", "Eth", "Gar", "Hal", "Ivan", "Jak", "Kor"],
            Race::Demon => &["Mal", "Zar", "Vor", "Nix", "Kor", "Xel", "Bal", "Mor", "Drak", "Ash"],
            Race::Dwarf => &["Thur", "Brum", "Gar", "Dor", "Bol", "Grim", "Thor", "Bron", "Dur", "Gor"],
            Race::Dragon => &["Vyx", "Zyr", "Kael", "Drac", "Sorn", "Ryx", "Nax", "Vorn", "Tyrn", "Xar"],
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Race::Elf => write!(f, "elf"),
            Race::Orc => write!(f, "orc"),
            Race::Human => write!(f, "human"),
            Race::Demon => write!(f, "demon"),
            Race::Dwarf => write!(f, "dwarf"),
            Race::Dragon => write!(f, "dragon"),
        }
    }
}

/// Naming style, selecting the name suffix table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameStyle {
    #[default]
    Fantasy,
    Scifi,
    Cute,
    Dark,
    Noble,
    Warrior,
}

impl NameStyle {
    pub const ALL: [NameStyle; 6] = [
        NameStyle::Fantasy,
        NameStyle::Scifi,
        NameStyle::Cute,
        NameStyle::Dark,
        NameStyle::Noble,
        NameStyle::Warrior,
    ];

    /// Parse a style name. Unknown names fall back to [`NameStyle::Fantasy`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "fantasy" => NameStyle::Fantasy,
            "scifi" | "sci-fi" => NameStyle::Scifi,
            "cute" => NameStyle::Cute,
            "dark" => NameStyle::Dark,
            "noble" => NameStyle::Noble,
            "warrior" => NameStyle::Warrior,
            other => {
                tracing::debug!(style = other, "unknown name style, using fantasy");
                NameStyle::default()
            }
        }
    }

    fn suffixes(self) -> &'static [&'static str] {
        match self {
            NameStyle::Fantasy => &["iel", "wen", "dor", "mir", "thas", "orn", "ael", "ith", "ion", "ara"],
            NameStyle::Scifi => &["ex", "on", "ax", "ix", "or", "an", "is", "os", "us", "ar"],
            NameStyle::Cute => &["i", "y", "ie", "ling", "kin", "belle", "star", "bloom", "heart", "puff"],
            NameStyle::Dark => &["bane", "doom", "shade", "void", "dread", "mort", "night", "shadow", "grim", "fell"],
            NameStyle::Noble => &["worth", "crest", "helm", "crown", "shield", "guard", "reign", "throne", "lord", "grace"],
            NameStyle::Warrior => &["blade", "fang", "storm", "iron", "steel", "rage", "fury", "blood", "war", "strike"],
        }
    }
}

impl fmt::Display for NameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameStyle::Fantasy => write!(f, "fantasy"),
            NameStyle::Scifi => write!(f, "scifi"),
            NameStyle::Cute => write!(f, "cute"),
            NameStyle::Dark => write!(f, "dark"),
            NameStyle::Noble => write!(f, "noble"),
            NameStyle::Warrior => write!(f, "warrior"),
        }
    }
}

pub(crate) fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// `count` names, each a race prefix followed by a style suffix.
pub fn generate_names<R: Rng + ?Sized>(
    rng: &mut R,
    race: Race,
    style: NameStyle,
    count: usize,
) -> Vec<String> {
    (0..count)
        .map(|_| format!("{}{}", pick(rng, race.prefixes()), pick(rng, style.suffixes())))
        .collect()
}

/// A single name for the workbench's randomize button.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}{}",
        pick(rng, &WORKBENCH_PREFIXES),
        pick(rng, &WORKBENCH_SUFFIXES)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generates_requested_count_from_tables() {
        let mut rng = StdRng::seed_from_u64(7);
        let names = generate_names(&mut rng, Race::Orc, NameStyle::Dark, 10);
        assert_eq!(names.len(), 10);
        for name in &names {
            let prefix = Race::Orc
                .prefixes()
                .iter()
                .find(|p| name.starts_with(**p))
                .expect("orc prefix");
            let rest = &name[prefix.len()..];
            assert!(NameStyle::Dark.suffixes().contains(&rest), "{name}");
        }
    }

    #[test]
    fn unknown_inputs_fall_back_to_defaults() {
        assert_eq!(Race::from_name("goblin"), Race::Human);
        assert_eq!(NameStyle::from_name("steampunk"), NameStyle::Fantasy);
        assert_eq!(NameStyle::from_name("Sci-Fi"), NameStyle::Scifi);
        assert_eq!(Race::from_name(" Elf "), Race::Elf);
    }

    #[test]
    fn display_roundtrips_through_from_name() {
        for race in Race::ALL {
            assert_eq!(Race::from_name(&race.to_string()), race);
        }
        for style in NameStyle::ALL {
            assert_eq!(NameStyle::from_name(&style.to_string()), style);
        }
    }

    #[test]
    fn random_name_uses_workbench_tables() {
        let mut rng = StdRng::seed_from_u64(1);
        let name = random_name(&mut rng);
        let prefix = WORKBENCH_PREFIXES
            .iter()
            .find(|p| name.starts_with(**p))
            .expect("prefix");
        assert!(WORKBENCH_SUFFIXES.contains(&&name[prefix.len()..]));
    }
}
