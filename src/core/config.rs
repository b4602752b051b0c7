//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.colloquy/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use clap::ValueEnum;

use crate::MetricsPreset;
use crate::layout::position::VerticalAnchor;
use crate::layout::style::{CalculatorConfig, DEFAULT_COMPACTION_WINDOW_SECS};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ColloquyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub thread: Option<String>,
    pub preset: Option<MetricsPreset>,
    /// Minutes east of UTC used for day boundaries.
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub avatar_position: Option<VerticalAnchor>,
    pub compaction_window_secs: Option<i64>,
    pub typing_indicator: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ImagesConfig {
    pub enabled: Option<bool>,
    pub focus_on_faces: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("colloquy/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// `None` shows the bundled demo thread.
    pub thread_path: Option<PathBuf>,
    pub preset: MetricsPreset,
    pub calculator: CalculatorConfig,
    pub typing_indicator: bool,
    pub images_enabled: bool,
    pub focus_on_faces: bool,
    pub image_timeout: Duration,
    pub user_agent: String,
    pub utc_offset: FixedOffset,
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

/// Returns the path to `~/.colloquy/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".colloquy").join("config.toml"))
}

/// Load config from `~/.colloquy/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ColloquyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ColloquyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ColloquyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ColloquyConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ColloquyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Colloquy Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# thread = "~/threads/team.json"      # Or set COLLOQUY_THREAD; omit for the demo
# preset = "cells"                    # "cells" or "points"
# utc_offset_minutes = 0              # Day boundaries for date labels

# [layout]
# avatar_position = "message_label_top"
#   # "cell_top", "message_label_top", "message_top",
#   # "message_center", "message_bottom", "cell_bottom"
# compaction_window_secs = 60
# typing_indicator = false

# [images]
# enabled = true
# focus_on_faces = false
# timeout_secs = 10
# user_agent = "colloquy/0.1.0"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Values taken from `COLLOQUY_*` environment variables.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub thread: Option<String>,
    pub preset: Option<MetricsPreset>,
    pub avatar: Option<VerticalAnchor>,
    pub utc_offset_minutes: Option<i32>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            thread: std::env::var("COLLOQUY_THREAD").ok(),
            preset: parse_env("COLLOQUY_PRESET", |s| MetricsPreset::from_str(s, true).ok()),
            avatar: parse_env("COLLOQUY_AVATAR", |s| VerticalAnchor::from_str(s, true).ok()),
            utc_offset_minutes: parse_env("COLLOQUY_UTC_OFFSET", |s| s.parse().ok()),
        }
    }
}

fn parse_env<T>(key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        warn!("Ignoring invalid {key}={raw}");
    }
    parsed
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub thread: Option<PathBuf>,
    pub preset: Option<MetricsPreset>,
    pub avatar: Option<VerticalAnchor>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ColloquyConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, &EnvOverrides::from_env(), cli)
}

pub fn resolve_with(
    config: &ColloquyConfig,
    env: &EnvOverrides,
    cli: &CliOverrides,
) -> ResolvedConfig {
    let thread_path = cli
        .thread
        .clone()
        .or_else(|| env.thread.as_deref().map(expand_home))
        .or_else(|| config.general.thread.as_deref().map(expand_home));

    let preset = cli
        .preset
        .or(env.preset)
        .or(config.general.preset)
        .unwrap_or_default();

    let avatar = cli
        .avatar
        .or(env.avatar)
        .or(config.layout.avatar_position)
        .unwrap_or_default();

    let utc_offset = env
        .utc_offset_minutes
        .or(config.general.utc_offset_minutes)
        .map(|minutes| {
            FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| {
                warn!("UTC offset of {minutes} minutes is out of range, using UTC");
                Utc.fix()
            })
        })
        .unwrap_or_else(|| Utc.fix());

    let mut calculator = preset.calculator_config().with_avatar_vertical(avatar);
    calculator.compaction_window_secs = config
        .layout
        .compaction_window_secs
        .unwrap_or(DEFAULT_COMPACTION_WINDOW_SECS);
    calculator.utc_offset = utc_offset;

    ResolvedConfig {
        thread_path,
        preset,
        calculator,
        typing_indicator: config.layout.typing_indicator.unwrap_or(false),
        images_enabled: config.images.enabled.unwrap_or(true),
        focus_on_faces: config.images.focus_on_faces.unwrap_or(false),
        image_timeout: Duration::from_secs(
            config
                .images
                .timeout_secs
                .unwrap_or(DEFAULT_IMAGE_TIMEOUT_SECS),
        ),
        user_agent: config
            .images
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        utc_offset,
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_plain(config: &ColloquyConfig) -> ResolvedConfig {
        resolve_with(config, &EnvOverrides::default(), &CliOverrides::default())
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_plain(&ColloquyConfig::default());
        assert_eq!(resolved.thread_path, None);
        assert_eq!(resolved.preset, MetricsPreset::Cells);
        assert_eq!(
            resolved.calculator.incoming.avatar_position.vertical,
            VerticalAnchor::MessageLabelTop
        );
        assert_eq!(resolved.calculator.compaction_window_secs, 60);
        assert!(resolved.images_enabled);
        assert!(!resolved.focus_on_faces);
        assert_eq!(resolved.image_timeout, Duration::from_secs(10));
        assert_eq!(resolved.utc_offset, Utc.fix());
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = ColloquyConfig {
            general: GeneralConfig {
                thread: Some("/tmp/t.json".to_string()),
                preset: Some(MetricsPreset::Points),
                utc_offset_minutes: Some(120),
            },
            layout: LayoutConfig {
                avatar_position: Some(VerticalAnchor::CellBottom),
                compaction_window_secs: Some(300),
                typing_indicator: Some(true),
            },
            images: ImagesConfig {
                enabled: Some(false),
                focus_on_faces: Some(true),
                timeout_secs: Some(3),
                user_agent: Some("ua".to_string()),
            },
        };
        let resolved = resolve_plain(&config);
        assert_eq!(resolved.thread_path, Some(PathBuf::from("/tmp/t.json")));
        assert_eq!(resolved.preset, MetricsPreset::Points);
        assert_eq!(resolved.calculator.metrics.line_height, 17.0);
        assert_eq!(
            resolved.calculator.outgoing.avatar_position.vertical,
            VerticalAnchor::CellBottom
        );
        assert_eq!(resolved.calculator.compaction_window_secs, 300);
        assert_eq!(resolved.utc_offset.local_minus_utc(), 7200);
        assert_eq!(resolved.calculator.utc_offset, resolved.utc_offset);
        assert!(resolved.typing_indicator);
        assert!(!resolved.images_enabled);
        assert!(resolved.focus_on_faces);
        assert_eq!(resolved.user_agent, "ua");
    }

    #[test]
    fn test_env_beats_file_and_cli_beats_env() {
        let config = ColloquyConfig {
            general: GeneralConfig {
                preset: Some(MetricsPreset::Points),
                thread: Some("/from/file.json".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = EnvOverrides {
            thread: Some("/from/env.json".to_string()),
            preset: Some(MetricsPreset::Cells),
            avatar: Some(VerticalAnchor::MessageTop),
            utc_offset_minutes: None,
        };
        let resolved = resolve_with(&config, &env, &CliOverrides::default());
        assert_eq!(resolved.thread_path, Some(PathBuf::from("/from/env.json")));
        assert_eq!(resolved.preset, MetricsPreset::Cells);

        let cli = CliOverrides {
            thread: Some(PathBuf::from("/from/cli.json")),
            preset: Some(MetricsPreset::Points),
            avatar: Some(VerticalAnchor::MessageCenter),
        };
        let resolved = resolve_with(&config, &env, &cli);
        assert_eq!(resolved.thread_path, Some(PathBuf::from("/from/cli.json")));
        assert_eq!(resolved.preset, MetricsPreset::Points);
        assert_eq!(
            resolved.calculator.incoming.avatar_position.vertical,
            VerticalAnchor::MessageCenter
        );
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let config = ColloquyConfig {
            general: GeneralConfig {
                utc_offset_minutes: Some(100_000),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve_plain(&config).utc_offset, Utc.fix());
    }

    #[test]
    fn test_toml_parses() {
        let toml_str = r#"
[general]
thread = "threads/team.json"
preset = "points"

[layout]
avatar_position = "message_bottom"
compaction_window_secs = 30

[images]
focus_on_faces = true
"#;
        let config: ColloquyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.thread.as_deref(), Some("threads/team.json"));
        assert_eq!(config.general.preset, Some(MetricsPreset::Points));
        assert_eq!(
            config.layout.avatar_position,
            Some(VerticalAnchor::MessageBottom)
        );
        assert_eq!(config.layout.compaction_window_secs, Some(30));
        assert_eq!(config.images.focus_on_faces, Some(true));
        assert!(config.images.enabled.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config: ColloquyConfig = toml::from_str("[layout]\ntyping_indicator = true\n").unwrap();
        assert_eq!(config.layout.typing_indicator, Some(true));
        assert!(config.general.thread.is_none());
    }

    #[test]
    fn test_unknown_preset_is_a_parse_error() {
        let result: Result<ColloquyConfig, _> = toml::from_str("[general]\npreset = \"pixels\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/abs/t.json"), PathBuf::from("/abs/t.json"));
    }
}
