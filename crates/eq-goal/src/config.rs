// config.rs — Where a quest keeps its files, and optional settings.
//
// `QuestConfig::for_root()` lays everything out under a `.quest/` directory
// in the chosen root. Settings come from `.quest/config.toml` when present;
// every key has a default so an empty or missing file is valid.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::UnknownTagPolicy;
use crate::error::GoalError;

/// File layout for one quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestConfig {
    /// Directory holding all quest files.
    pub quest_dir: PathBuf,

    /// The goal save file.
    pub save_file: PathBuf,

    /// JSONL history of quest events.
    pub events_log: PathBuf,

    /// Optional TOML settings.
    pub settings_file: PathBuf,
}

impl QuestConfig {
    /// Standard `.quest/` layout under `root`.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        let quest_dir = root.as_ref().join(".quest");
        Self {
            save_file: quest_dir.join("goals.txt"),
            events_log: quest_dir.join("events.jsonl"),
            settings_file: quest_dir.join("config.toml"),
            quest_dir,
        }
    }

    /// Use a different save file, keeping the rest of the layout.
    pub fn with_save_file(mut self, save_file: impl Into<PathBuf>) -> Self {
        self.save_file = save_file.into();
        self
    }
}

/// Settings read from `.quest/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestSettings {
    #[serde(default)]
    pub load: LoadSettings,

    #[serde(default)]
    pub events: EventSettings,
}

/// How save files are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSettings {
    /// `skip` (default) drops unrecognized goal lines, `reject` fails the load.
    #[serde(default)]
    pub unknown_tags: UnknownTagPolicy,
}

/// Event history settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSettings {
    /// Append events to the JSONL log.
    #[serde(default = "default_events_enabled")]
    pub enabled: bool,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            enabled: default_events_enabled(),
        }
    }
}

fn default_events_enabled() -> bool {
    true
}

impl QuestSettings {
    /// Parse settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, GoalError> {
        let content = fs::read_to_string(path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| GoalError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse settings, falling back to defaults when the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self, GoalError> {
        match Self::load(path) {
            Err(GoalError::IoError { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }
}
