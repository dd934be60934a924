// persistence.rs — End-to-end store lifecycle against real files.
//
// Exercises the project layout, file-backed storage, the event log and the
// reload path together:
//
//   1. First load on an empty project seeds the default goals
//   2. Create / record / delete through the store
//   3. A second process (fresh store) sees the same goals and score
//   4. The event log holds one line per mutation
//   5. A corrupted goal file is replaced by the defaults on the next load

use std::fs;

use tempfile::tempdir;

use eq_goal::{
    EventDispatcher, FileStorage, GoalError, GoalStore, GoalType, LogSink, NewGoal, QuestConfig,
};

fn open(config: &QuestConfig) -> GoalStore<FileStorage> {
    let settings = config.settings().unwrap();
    let storage = FileStorage::new(&config.storage_dir).unwrap();
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_sink(Box::new(LogSink::new(&config.events_log)));
    let outcome = GoalStore::load_with(storage, &settings, dispatcher);
    assert!(outcome.is_persisted());
    outcome.into_value()
}

#[test]
fn store_lifecycle_survives_reopen() {
    let project = tempdir().unwrap();
    let config = QuestConfig::for_project(project.path());

    // First run: defaults.
    let mut store = open(&config);
    assert_eq!(store.total_score(), 350);
    assert_eq!(store.goals().len(), 3);
    assert!(config.storage_dir.join("eternalQuestGoals").exists());
    assert_eq!(
        fs::read_to_string(config.storage_dir.join("eternalQuestScore")).unwrap(),
        "350"
    );

    let id = store
        .create(&NewGoal::checklist(
            "Read Books",
            "Finish five books this year",
            20,
            5,
            100,
        ))
        .unwrap()
        .into_value()
        .id;
    assert_eq!(store.record(&id).unwrap().value.points, 20);
    assert_eq!(store.record("2").unwrap().value.points, 100);
    assert!(store.delete("1").value);
    drop(store);

    // Second run: same state, earned points kept after the delete.
    let mut store = open(&config);
    assert_eq!(store.total_score(), 470);
    let ids: Vec<&str> = store.goals().iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, ["2", "3", id.as_str()]);
    let books = store.get(&id).unwrap();
    assert_eq!(books.goal_type(), GoalType::Checklist);
    assert_eq!(books.progress_label(), "1/5");
    assert!(matches!(store.record("1"), Err(GoalError::NotFound(_))));

    // Seeded + created + 2 recorded + deleted.
    let log = fs::read_to_string(&config.events_log).unwrap();
    let types: Vec<String> = log
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["event_type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        types,
        [
            "defaults_seeded",
            "goal_created",
            "event_recorded",
            "event_recorded",
            "goal_deleted"
        ]
    );
}

#[test]
fn corrupted_goal_file_reseeds_defaults() {
    let project = tempdir().unwrap();
    let config = QuestConfig::for_project(project.path());

    let mut store = open(&config);
    store.record("2").unwrap();
    drop(store);

    fs::write(config.storage_dir.join("eternalQuestGoals"), "[{\"id\":").unwrap();

    let store = open(&config);
    assert_eq!(store.total_score(), 350);
    assert_eq!(store.goals().len(), 3);
    let stored = fs::read_to_string(config.storage_dir.join("eternalQuestGoals")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
}

#[test]
fn settings_file_changes_keys() {
    let project = tempdir().unwrap();
    let config = QuestConfig::for_project(project.path());
    fs::create_dir_all(config.settings_file.parent().unwrap()).unwrap();
    fs::write(
        &config.settings_file,
        "[storage]\ngoals_key = \"goals\"\nscore_key = \"score\"\n",
    )
    .unwrap();

    let _store = open(&config);
    assert!(config.storage_dir.join("goals").exists());
    assert!(config.storage_dir.join("score").exists());
    assert!(!config.storage_dir.join("eternalQuestGoals").exists());
}
