// config.rs — Project layout and settings.
//
// `QuestConfig::for_project()` places all state under a `.quest/` directory
// in the project root. Optional settings are read from `.quest/quest.toml`;
// every field has a default, so the file may be absent or partial.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GoalError;

/// Where a project keeps its goal state.
#[derive(Debug, Clone)]
pub struct QuestConfig {
    /// Directory for key-value storage files (one file per key).
    pub storage_dir: PathBuf,

    /// Path to the event notification log.
    pub events_log: PathBuf,

    /// Path to the optional TOML settings file.
    pub settings_file: PathBuf,
}

impl QuestConfig {
    /// Create a config with the standard `.quest/` layout for a project.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let quest_dir = project_root.as_ref().join(".quest");
        Self {
            storage_dir: quest_dir.join("storage"),
            events_log: quest_dir.join("events.jsonl"),
            settings_file: quest_dir.join("quest.toml"),
        }
    }

    /// Load settings from `settings_file`, defaulting when it doesn't exist.
    pub fn settings(&self) -> Result<QuestSettings, GoalError> {
        QuestSettings::load_or_default(&self.settings_file)
    }
}

/// Top-level settings from `.quest/quest.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestSettings {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

/// Names of the two persisted key-value entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Key holding the serialized goal array.
    #[serde(default = "default_goals_key")]
    pub goals_key: String,

    /// Key holding the total score as a decimal string.
    #[serde(default = "default_score_key")]
    pub score_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            goals_key: default_goals_key(),
            score_key: default_score_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Points per level: level = score / level_span + 1.
    #[serde(default = "default_level_span")]
    pub level_span: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            level_span: default_level_span(),
        }
    }
}

// Serde default functions
fn default_goals_key() -> String {
    "eternalQuestGoals".to_string()
}

fn default_score_key() -> String {
    "eternalQuestScore".to_string()
}

fn default_level_span() -> u64 {
    1000
}

impl QuestSettings {
    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, GoalError> {
        let settings: QuestSettings =
            toml::from_str(content).map_err(|e| GoalError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, GoalError> {
        let content = std::fs::read_to_string(path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load settings, returning defaults if the file doesn't exist.
    ///
    /// A file that exists but can't be parsed is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, GoalError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<(), GoalError> {
        if self.display.level_span == 0 {
            return Err(GoalError::Config(
                "display.level_span must be at least 1".to_string(),
            ));
        }
        if self.storage.goals_key.is_empty() || self.storage.score_key.is_empty() {
            return Err(GoalError::Config("storage keys must not be empty".to_string()));
        }
        if self.storage.goals_key == self.storage.score_key {
            return Err(GoalError::Config(
                "storage.goals_key and storage.score_key must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn for_project_uses_quest_dir() {
        let config = QuestConfig::for_project("/tmp/project");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/project/.quest/storage"));
        assert_eq!(config.events_log, PathBuf::from("/tmp/project/.quest/events.jsonl"));
        assert_eq!(config.settings_file, PathBuf::from("/tmp/project/.quest/quest.toml"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = QuestConfig::for_project(dir.path());
        let settings = config.settings().unwrap();
        assert_eq!(settings, QuestSettings::default());
        assert_eq!(settings.storage.goals_key, "eternalQuestGoals");
        assert_eq!(settings.storage.score_key, "eternalQuestScore");
        assert_eq!(settings.display.level_span, 1000);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let settings = QuestSettings::parse("[display]\nlevel_span = 500\n").unwrap();
        assert_eq!(settings.display.level_span, 500);
        assert_eq!(settings.storage.goals_key, "eternalQuestGoals");
    }

    #[test]
    fn rejects_zero_level_span() {
        let err = QuestSettings::parse("[display]\nlevel_span = 0\n").unwrap_err();
        assert!(matches!(err, GoalError::Config(_)));
    }

    #[test]
    fn rejects_identical_keys() {
        let toml = "[storage]\ngoals_key = \"same\"\nscore_key = \"same\"\n";
        assert!(QuestSettings::parse(toml).is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quest.toml");
        std::fs::write(&path, "[storage]\ngoals_key = \"myGoals\"\n").unwrap();
        let settings = QuestSettings::load_or_default(&path).unwrap();
        assert_eq!(settings.storage.goals_key, "myGoals");
        assert_eq!(settings.storage.score_key, "eternalQuestScore");
    }
}
