//! Mock content generators.
//!
//! Every generated value (names, persona text, portrait URLs, chat
//! replies) is picked from fixed candidate lists. Inputs outside the known
//! enumerations fall back to a default category, so nothing here can fail.
//!
//! Callers go through the [`ContentGenerator`] trait so that a real
//! generation backend, or a seeded one in tests, can be swapped in.

pub mod avatar;
pub mod names;
pub mod persona;
pub mod reply;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub use avatar::{AvatarPrompt, TagCategory};
pub use names::{NameStyle, Race};

/// Source of generated character content.
///
/// Methods take `&mut self` because implementations are expected to carry
/// RNG state; repeated calls are not idempotent.
pub trait ContentGenerator: Send {
    /// One name for the workbench's randomize button.
    fn random_name(&mut self) -> String;

    /// A batch of names for the name generator.
    fn names(&mut self, race: Race, style: NameStyle, count: usize) -> Vec<String>;

    /// Persona text expanded from trait keywords. Empty for no keywords.
    fn persona(&mut self, keywords: &[String]) -> String;

    /// A single portrait URL for the workbench.
    fn avatar_url(&mut self) -> String;

    /// A batch of portrait URLs for the avatar maker.
    fn avatars(&mut self, prompt: &AvatarPrompt, count: usize) -> Vec<String>;

    /// The character's reply to a chat message. Non-empty for a non-empty name.
    fn chat_reply(&mut self, name: &str, input: &str) -> String;
}

/// Template-based generator backed by a `StdRng`.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    rng: StdRng,
    avatar_base_url: String,
}

impl TemplateGenerator {
    /// Generator seeded from OS entropy.
    pub fn new(avatar_base_url: impl Into<String>) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            avatar_base_url: avatar_base_url.into(),
        }
    }

    /// Deterministic generator for tests and reproducible runs.
    pub fn seeded(seed: u64, avatar_base_url: impl Into<String>) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            avatar_base_url: avatar_base_url.into(),
        }
    }
}

impl ContentGenerator for TemplateGenerator {
    fn random_name(&mut self) -> String {
        names::random_name(&mut self.rng)
    }

    fn names(&mut self, race: Race, style: NameStyle, count: usize) -> Vec<String> {
        tracing::debug!(%race, %style, count, "generating names");
        names::generate_names(&mut self.rng, race, style, count)
    }

    fn persona(&mut self, keywords: &[String]) -> String {
        tracing::debug!(keywords = ?keywords, "expanding persona");
        persona::expand_persona(&mut self.rng, keywords)
    }

    fn avatar_url(&mut self) -> String {
        let seed = self.rng.next_u64();
        avatar::avatar_url(&self.avatar_base_url, &seed.to_string())
    }

    fn avatars(&mut self, prompt: &AvatarPrompt, count: usize) -> Vec<String> {
        tracing::debug!(
            description = %prompt.description,
            hair = ?prompt.hair,
            eyes = ?prompt.eyes,
            outfit = ?prompt.outfit,
            count,
            "generating avatars"
        );
        // Batch seeds stay below 10^12; the per-image index is appended to them.
        let seed = self.rng.next_u64() % 1_000_000_000_000;
        avatar::avatar_batch(&self.avatar_base_url, seed, count)
    }

    fn chat_reply(&mut self, name: &str, _input: &str) -> String {
        reply::chat_reply(&mut self.rng, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://picsum.photos";

    #[test]
    fn seeded_generators_agree() {
        let mut a = TemplateGenerator::seeded(42, BASE);
        let mut b = TemplateGenerator::seeded(42, BASE);
        assert_eq!(a.random_name(), b.random_name());
        assert_eq!(a.avatar_url(), b.avatar_url());
    }

    #[test]
    fn avatar_urls_change_between_calls() {
        let mut generator = TemplateGenerator::seeded(1, BASE);
        let first = generator.avatar_url();
        let second = generator.avatar_url();
        assert_ne!(first, second);
        assert!(first.starts_with("https://picsum.photos/seed/"));
        assert!(first.ends_with("/400/400"));
    }

    #[test]
    fn avatar_batch_respects_count() {
        let mut generator = TemplateGenerator::seeded(2, BASE);
        let urls = generator.avatars(&AvatarPrompt::new("a knight"), 4);
        assert_eq!(urls.len(), 4);
    }

    #[test]
    fn names_respect_count() {
        let mut generator = TemplateGenerator::seeded(3, BASE);
        assert_eq!(generator.names(Race::Elf, NameStyle::Cute, 10).len(), 10);
        assert!(generator.names(Race::Elf, NameStyle::Cute, 0).is_empty());
    }
}
