//! Global configuration types for OC Forge.
//!
//! `GlobalConfig` represents the top-level `config.toml` controlling the
//! simulated generation latency and batch sizes of the mock generators.

use serde::{Deserialize, Serialize};

use std::time::Duration;

/// Top-level configuration.
///
/// Loaded from `~/.ocforge/config.toml`. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Simulated latency of persona generation.
    #[serde(default = "default_persona_delay_ms")]
    pub persona_delay_ms: u64,

    /// Simulated latency of avatar generation.
    #[serde(default = "default_avatar_delay_ms")]
    pub avatar_delay_ms: u64,

    /// Simulated latency before a chat reply arrives.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Simulated latency of the name generator.
    #[serde(default = "default_names_delay_ms")]
    pub names_delay_ms: u64,

    /// Base URL of the placeholder image service.
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,

    /// Names produced per name-generator run.
    #[serde(default = "default_name_batch_size")]
    pub name_batch_size: usize,

    /// Avatars produced per avatar-maker run.
    #[serde(default = "default_avatar_batch_size")]
    pub avatar_batch_size: usize,
}

fn default_persona_delay_ms() -> u64 {
    1000
}

fn default_avatar_delay_ms() -> u64 {
    1500
}

fn default_reply_delay_ms() -> u64 {
    1000
}

fn default_names_delay_ms() -> u64 {
    500
}

fn default_avatar_base_url() -> String {
    "https://picsum.photos".to_string()
}

fn default_name_batch_size() -> usize {
    10
}

fn default_avatar_batch_size() -> usize {
    4
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            persona_delay_ms: default_persona_delay_ms(),
            avatar_delay_ms: default_avatar_delay_ms(),
            reply_delay_ms: default_reply_delay_ms(),
            names_delay_ms: default_names_delay_ms(),
            avatar_base_url: default_avatar_base_url(),
            name_batch_size: default_name_batch_size(),
            avatar_batch_size: default_avatar_batch_size(),
        }
    }
}

impl GlobalConfig {
    /// A config with every simulated delay set to zero.
    pub fn instant() -> Self {
        Self {
            persona_delay_ms: 0,
            avatar_delay_ms: 0,
            reply_delay_ms: 0,
            names_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn latency(&self) -> SimulatedLatency {
        SimulatedLatency {
            persona: Duration::from_millis(self.persona_delay_ms),
            avatar: Duration::from_millis(self.avatar_delay_ms),
            reply: Duration::from_millis(self.reply_delay_ms),
            names: Duration::from_millis(self.names_delay_ms),
        }
    }
}

/// Resolved simulated delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub persona: Duration,
    pub avatar: Duration,
    pub reply: Duration,
    pub names: Duration,
}
