//! Plugin manifest parsing (`spyglass-plugin.toml`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use spyglass_core::{EngineDescriptor, LanguageDescriptor};

pub(crate) const MANIFEST_FILENAME: &str = "spyglass-plugin.toml";

/// Top-level plugin manifest parsed from `spyglass-plugin.toml`.
#[derive(Debug, Deserialize)]
pub(crate) struct PluginManifest {
    pub engine: EngineSection,

    /// Output languages, in preference order. The first is the engine default.
    #[serde(default)]
    pub languages: Vec<LanguageSection>,
}

/// Engine metadata and how to launch it.
#[derive(Debug, Deserialize)]
pub(crate) struct EngineSection {
    /// Unique engine id (e.g., "razor", "handlebars").
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub version: Option<String>,

    /// Executable implementing the engine, relative to the manifest directory
    /// or absolute. Bare names are looked up on `PATH`.
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageSection {
    pub id: String,
    pub name: String,
}

impl PluginManifest {
    /// Load a manifest from a directory containing `spyglass-plugin.toml`.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let manifest_path = dir.join(MANIFEST_FILENAME);
        let contents = std::fs::read_to_string(&manifest_path).map_err(|e| ManifestError::Io {
            path: manifest_path.clone(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ManifestError::Parse {
            path: manifest_path,
            source: e,
        })
    }

    /// Structural problems that keep this plugin from being registered.
    pub fn validate(&self, base_dir: &Path) -> Vec<String> {
        let mut errors = Vec::new();

        if self.engine.id.trim().is_empty() {
            errors.push("engine.id is empty".to_string());
        }
        if self.engine.name.trim().is_empty() {
            errors.push("engine.name is empty".to_string());
        }
        if self.engine.command.trim().is_empty() {
            errors.push("engine.command is empty".to_string());
        } else if is_path_like(&self.engine.command) {
            let command = self.command_path(base_dir);
            if !command.is_file() {
                errors.push(format!(
                    "engine.command '{}' does not exist",
                    self.engine.command
                ));
            }
        }

        if self.languages.is_empty() {
            errors.push("no [[languages]] declared".to_string());
        }
        let mut seen = HashSet::new();
        for language in &self.languages {
            if language.id.trim().is_empty() {
                errors.push(format!("language '{}' has an empty id", language.name));
            } else if !seen.insert(language.id.as_str()) {
                errors.push(format!("language '{}' declared twice", language.id));
            }
        }

        errors
    }

    /// Resolve the engine command against the manifest directory.
    pub fn command_path(&self, base_dir: &Path) -> PathBuf {
        let command = Path::new(&self.engine.command);
        if command.is_absolute() || !is_path_like(&self.engine.command) {
            command.to_path_buf()
        } else {
            base_dir.join(command)
        }
    }

    pub fn descriptor(&self) -> EngineDescriptor {
        EngineDescriptor::new(
            self.engine.id.as_str(),
            self.engine.name.as_str(),
            self.languages
                .iter()
                .map(|l| LanguageDescriptor::new(l.id.as_str(), l.name.as_str()))
                .collect(),
        )
    }
}

fn is_path_like(command: &str) -> bool {
    command.contains('/') || command.contains('\\')
}

/// Errors that can occur during manifest loading.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
