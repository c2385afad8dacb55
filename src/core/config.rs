//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.anonchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::Variant;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfigFile {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub peers: PeersConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub mode: Option<Variant>,
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MatchingConfig {
    pub delay_min_ms: Option<u64>,
    pub delay_max_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PeersConfig {
    pub tick_ms: Option<u64>,
    pub emit_probability: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LimitsConfig {
    pub max_interests: Option<usize>,
    pub max_message_length: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MATCH_DELAY_MS: (u64, u64) = (2000, 5000);
pub const PAIRED_TICK_MS: u64 = 4000;
pub const BROADCAST_TICK_MS: u64 = 5000;
pub const PAIRED_EMIT_PROBABILITY: f64 = 0.2;
pub const BROADCAST_EMIT_PROBABILITY: f64 = 0.3;
pub const MAX_INTERESTS: usize = 5;
pub const MAX_MESSAGE_LENGTH: usize = 500;

// ============================================================================
// Variant shape
// ============================================================================

/// Whether the room is one shared public channel or a one-on-one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomMode {
    Broadcast,
    Paired,
}

/// Feature switches that distinguish the public room, the paired chat, and
/// the simplified public room. One state machine serves all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantConfig {
    pub mode: RoomMode,
    /// `send_message` is a no-op unless a partner is connected.
    pub require_connection_to_send: bool,
    /// Every message carries a display name ("You", or a random peer name).
    pub show_sender_label: bool,
    /// Maintain the cosmetic "N online" counter.
    pub track_online_count: bool,
}

impl VariantConfig {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Broadcast => Self {
                mode: RoomMode::Broadcast,
                require_connection_to_send: false,
                show_sender_label: true,
                track_online_count: true,
            },
            Variant::Paired => Self {
                mode: RoomMode::Paired,
                require_connection_to_send: true,
                show_sender_label: false,
                track_online_count: false,
            },
            Variant::Simple => Self {
                mode: RoomMode::Broadcast,
                require_connection_to_send: false,
                show_sender_label: true,
                track_online_count: false,
            },
        }
    }
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    pub variant_name: Variant,
    pub variant: VariantConfig,
    /// Inclusive bounds of the simulated matching delay.
    pub match_delay_ms: (u64, u64),
    pub tick_ms: u64,
    pub emit_probability: f64,
    pub max_interests: usize,
    pub max_message_length: usize,
    pub seed: Option<u64>,
}

impl ChatConfig {
    /// Built-in settings for a variant, with nothing overridden.
    pub fn for_variant(variant: Variant) -> Self {
        let (tick_ms, emit_probability) = match variant {
            Variant::Paired => (PAIRED_TICK_MS, PAIRED_EMIT_PROBABILITY),
            Variant::Broadcast | Variant::Simple => {
                (BROADCAST_TICK_MS, BROADCAST_EMIT_PROBABILITY)
            }
        };
        Self {
            variant_name: variant,
            variant: VariantConfig::for_variant(variant),
            match_delay_ms: DEFAULT_MATCH_DELAY_MS,
            tick_ms,
            emit_probability,
            max_interests: MAX_INTERESTS,
            max_message_length: MAX_MESSAGE_LENGTH,
            seed: None,
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.anonchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".anonchat").join("config.toml"))
}

/// Load config from `~/.anonchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfigFile::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatConfigFile, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatConfigFile::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ChatConfigFile, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChatConfigFile::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatConfigFile = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# anonchat configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# mode = "paired"                # "broadcast", "paired" or "simple"
# seed = 42                      # Fixed seed replays the same simulated session

# [matching]
# delay_min_ms = 2000
# delay_max_ms = 5000

# [peers]
# tick_ms = 4000                 # Default: 4000 paired, 5000 public rooms
# emit_probability = 0.2         # Default: 0.2 paired, 0.3 public rooms

# [limits]
# max_interests = 5
# max_message_length = 500
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_mode` and `cli_seed` are from CLI flags (None = not specified).
pub fn resolve(
    config: &ChatConfigFile,
    cli_mode: Option<Variant>,
    cli_seed: Option<u64>,
) -> ChatConfig {
    // Mode: CLI → env → config → default
    let variant = cli_mode
        .or_else(|| env_parse::<Variant>("ANONCHAT_MODE"))
        .or(config.general.mode)
        .unwrap_or_default();

    // Seed: CLI → env → config → none (entropy)
    let seed = cli_seed
        .or_else(|| env_parse::<u64>("ANONCHAT_SEED"))
        .or(config.general.seed);

    let mut resolved = ChatConfig::for_variant(variant);
    resolved.seed = seed;

    let (default_min, default_max) = resolved.match_delay_ms;
    let min = config.matching.delay_min_ms.unwrap_or(default_min);
    let max = config.matching.delay_max_ms.unwrap_or(default_max);
    resolved.match_delay_ms = if min <= max {
        (min, max)
    } else {
        warn!("delay_min_ms {} exceeds delay_max_ms {}, swapping", min, max);
        (max, min)
    };

    if let Some(tick_ms) = config.peers.tick_ms {
        if tick_ms == 0 {
            warn!("peers.tick_ms must be positive, using 1");
        }
        resolved.tick_ms = tick_ms.max(1);
    }

    if let Some(probability) = config.peers.emit_probability {
        if !(0.0..=1.0).contains(&probability) {
            warn!("peers.emit_probability {} outside [0, 1], clamping", probability);
        }
        resolved.emit_probability = if probability.is_nan() {
            resolved.emit_probability
        } else {
            probability.clamp(0.0, 1.0)
        };
    }

    if let Some(max_interests) = config.limits.max_interests {
        resolved.max_interests = max_interests;
    }
    if let Some(max_message_length) = config.limits.max_message_length {
        resolved.max_message_length = max_message_length.max(1);
    }

    resolved
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}
