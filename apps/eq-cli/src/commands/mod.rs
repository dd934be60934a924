// mod.rs — Subcommand implementations and shared store setup.

pub mod goal;
pub mod stats;

use eq_goal::{
    EventDispatcher, FileStorage, GoalError, GoalStore, KeyValueStorage, LogSink, MemoryStorage,
    QuestConfig, QuestSettings,
};

/// Store type used by every command.
pub type Store = GoalStore<Box<dyn KeyValueStorage>>;

/// Load the project's goal store.
///
/// An unreadable settings file falls back to the default settings. When the
/// storage directory can't be created the store runs from memory only, so
/// the command still works and nothing is saved.
pub fn open_store(config: &QuestConfig) -> Store {
    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("settings unusable, using defaults: {}", e);
            report_settings_warning(config, &e);
            QuestSettings::default()
        }
    };

    let storage: Box<dyn KeyValueStorage> = match FileStorage::new(&config.storage_dir) {
        Ok(files) => Box::new(files),
        Err(e) => {
            tracing::warn!("storage unavailable, using in-memory store: {}", e);
            report_warning(&e);
            Box::new(MemoryStorage::new())
        }
    };

    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_sink(Box::new(LogSink::new(&config.events_log)));

    let outcome = GoalStore::load_with(storage, &settings, dispatcher);
    if let Some(ref e) = outcome.warning {
        report_warning(e);
    }
    outcome.into_value()
}

/// Print a transient storage notice.
pub fn report_warning(error: &GoalError) {
    eprintln!("Warning: error saving data ({}). Changes are kept in memory only.", error);
}

/// Print a notice that the settings file was ignored.
pub fn report_settings_warning(config: &QuestConfig, error: &GoalError) {
    eprintln!(
        "Warning: ignoring {} ({}). Using default settings.",
        config.settings_file.display(),
        error
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn open_store_seeds_project_files() {
        let project = tempdir().unwrap();
        let config = QuestConfig::for_project(project.path());

        let mut store = open_store(&config);
        assert_eq!(store.total_score(), 350);
        store.record("2").unwrap();
        drop(store);

        assert!(config.storage_dir.join("eternalQuestGoals").exists());
        assert!(fs::read_to_string(&config.events_log)
            .unwrap()
            .contains("event_recorded"));

        let store = open_store(&config);
        assert_eq!(store.total_score(), 450);
    }

    #[test]
    fn open_store_falls_back_to_memory() {
        let project = tempdir().unwrap();
        let config = QuestConfig::for_project(project.path());
        // A plain file where the storage directory should be.
        fs::create_dir_all(config.storage_dir.parent().unwrap()).unwrap();
        fs::write(&config.storage_dir, "not a directory").unwrap();

        let mut store = open_store(&config);
        assert_eq!(store.goals().len(), 3);
        let outcome = store.record("1").unwrap();
        assert!(outcome.is_persisted());
        assert_eq!(store.total_score(), 1350);
        assert!(config.storage_dir.is_file());
    }

    #[test]
    fn open_store_ignores_malformed_settings() {
        let project = tempdir().unwrap();
        let config = QuestConfig::for_project(project.path());
        fs::create_dir_all(config.settings_file.parent().unwrap()).unwrap();
        fs::write(&config.settings_file, "[display\nlevel_span = ").unwrap();

        let store = open_store(&config);
        assert_eq!(store.goals().len(), 3);
        assert_eq!(store.level(), 1);
        assert!(config.storage_dir.join("eternalQuestGoals").exists());
    }
}
