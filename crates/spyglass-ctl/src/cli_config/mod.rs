//! CLI configuration for plugin paths and inspector defaults.
//!
//! Separate from the core `ControllerConfig`; this controls where the CLI looks
//! for engines and what it selects when no flags are given.

pub(crate) mod loader;

pub(crate) use loader::load_cli_config;

use std::time::Duration;

use serde::Deserialize;
use spyglass_core::ControllerConfig;

fn default_debounce_ms() -> u64 {
    100
}

fn default_poll_interval_ms() -> u64 {
    250
}

/// CLI-specific configuration for engine discovery and selection defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// Additional paths to scan for engine plugins.
    #[serde(default)]
    pub plugin_paths: Vec<String>,

    /// Engine id selected when `--engine` is not given.
    pub default_engine: Option<String>,

    /// Language id selected when `--language` is not given.
    pub default_language: Option<String>,

    /// Generate in design-time mode unless overridden.
    #[serde(default)]
    pub design_time: bool,

    /// Quiet interval before a regeneration. Default: 100.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How often `watch` checks the template file for changes. Default: 250.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            plugin_paths: Vec::new(),
            default_engine: None,
            default_language: None,
            design_time: false,
            debounce_ms: default_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl CliConfig {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig::default().with_debounce(Duration::from_millis(self.debounce_ms))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
