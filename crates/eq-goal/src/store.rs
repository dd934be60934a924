// store.rs — GoalStore: the goal list, the total score, and their persistence.
//
// The whole store is two key-value entries: the goal array as JSON and the
// total score as a decimal string. Both are rewritten after every mutation.
// A failed write never undoes the mutation; it comes back to the caller as a
// warning on the `Outcome` and the store keeps working from memory.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use crate::config::{QuestSettings, StorageSettings};
use crate::error::GoalError;
use crate::events::{EventDispatcher, QuestEvent};
use crate::goal::{Goal, GoalKind, GoalType, NewGoal};
use crate::storage::KeyValueStorage;

/// Score of the default goal set.
pub const DEFAULT_SCORE: u64 = 350;

/// The result of an operation whose persistence step may have failed.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    /// Set when the store could not be written; the in-memory state is
    /// still updated.
    pub warning: Option<GoalError>,
}

impl<T> Outcome<T> {
    fn new(value: T, warning: Option<GoalError>) -> Self {
        Self { value, warning }
    }

    pub fn is_persisted(&self) -> bool {
        self.warning.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Points awarded by one `record` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    pub goal_id: String,
    pub points: u32,
    /// Completion state of the goal after this recording.
    pub completed: bool,
}

impl Award {
    /// True when the call awarded nothing because the goal was already done.
    pub fn already_completed(&self) -> bool {
        self.points == 0
    }
}

/// Aggregate numbers for the overview screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_score: u64,
    pub level: u64,
    pub total_goals: usize,
    pub completed: usize,
    pub simple: usize,
    pub eternal: usize,
    pub checklist: usize,
}

/// In-memory goal list and score, mirrored to key-value storage.
pub struct GoalStore<S: KeyValueStorage> {
    storage: S,
    keys: StorageSettings,
    level_span: u64,
    goals: Vec<Goal>,
    total_score: u64,
    dispatcher: EventDispatcher,
}

impl<S: KeyValueStorage> GoalStore<S> {
    /// Load with default settings and no event sinks.
    pub fn load(storage: S) -> Outcome<Self> {
        Self::load_with(storage, &QuestSettings::default(), EventDispatcher::new())
    }

    /// Load the store from `storage`.
    ///
    /// Missing or malformed data is replaced by the default goal set, which
    /// is persisted straight away. Loading itself never fails.
    pub fn load_with(
        storage: S,
        settings: &QuestSettings,
        dispatcher: EventDispatcher,
    ) -> Outcome<Self> {
        let loaded = read_state(&storage, &settings.storage);

        let mut store = Self {
            storage,
            keys: settings.storage.clone(),
            level_span: settings.display.level_span.max(1),
            goals: Vec::new(),
            total_score: 0,
            dispatcher,
        };

        let reason = match loaded {
            Ok(Some((goals, total_score))) => {
                tracing::debug!(goals = goals.len(), total_score, "loaded goal store");
                store.goals = goals;
                store.total_score = total_score;
                return Outcome::new(store, None);
            }
            Ok(None) => "no stored goals".to_string(),
            Err(e) => {
                tracing::warn!("stored goals unusable, loading defaults: {}", e);
                e.to_string()
            }
        };

        store.goals = default_goals();
        store.total_score = DEFAULT_SCORE;
        store.dispatcher.dispatch(&QuestEvent::defaults_seeded(reason));
        let warning = store.persist();
        Outcome::new(store, warning)
    }

    /// Write the full goal list and score to storage.
    ///
    /// Both entries are written together; on failure neither changes.
    pub fn save(&mut self) -> Result<(), GoalError> {
        let goals = serde_json::to_string(&self.goals)?;
        let score = self.total_score.to_string();
        self.storage.set_all(&[
            (self.keys.goals_key.as_str(), goals.as_str()),
            (self.keys.score_key.as_str(), score.as_str()),
        ])
    }

    /// Validate `input` and append a new goal with a fresh identifier.
    pub fn create(&mut self, input: &NewGoal) -> Result<Outcome<Goal>, GoalError> {
        let goal = Goal::new(self.fresh_id(), input)?;
        tracing::info!(goal_id = %goal.id, goal_type = %goal.goal_type(), "goal created");

        self.dispatcher.dispatch(&QuestEvent::goal_created(&goal));
        self.goals.push(goal.clone());
        let warning = self.persist();
        Ok(Outcome::new(goal, warning))
    }

    /// Apply one recording event to the goal `id` and add the award to the
    /// total score.
    pub fn record(&mut self, id: &str) -> Result<Outcome<Award>, GoalError> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| GoalError::NotFound(id.to_string()))?;

        let points = goal.record();
        let award = Award {
            goal_id: goal.id.clone(),
            points,
            completed: goal.is_completed(),
        };
        self.total_score = self.total_score.saturating_add(u64::from(points));

        let event = QuestEvent::event_recorded(goal, points, self.total_score);
        self.dispatcher.dispatch(&event);
        let warning = self.persist();
        Ok(Outcome::new(award, warning))
    }

    /// Remove the goal `id` if present. The total score is left unchanged.
    ///
    /// The value is whether a goal was removed; an unknown id is not an
    /// error. The store is persisted either way.
    pub fn delete(&mut self, id: &str) -> Outcome<bool> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        let removed = self.goals.len() != before;

        if removed {
            tracing::info!(goal_id = id, "goal deleted");
            self.dispatcher.dispatch(&QuestEvent::goal_deleted(id));
        }
        let warning = self.persist();
        Outcome::new(removed, warning)
    }

    /// All goals in insertion order.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Goals of one kind, or all goals when `goal_type` is `None`.
    pub fn goals_of_type(&self, goal_type: Option<GoalType>) -> impl Iterator<Item = &Goal> {
        self.goals
            .iter()
            .filter(move |g| match goal_type {
                Some(t) => g.goal_type() == t,
                None => true,
            })
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn level(&self) -> u64 {
        self.total_score / self.level_span + 1
    }

    pub fn summary(&self) -> Summary {
        let count = |t: GoalType| self.goals_of_type(Some(t)).count();
        Summary {
            total_score: self.total_score,
            level: self.level(),
            total_goals: self.goals.len(),
            completed: self.goals.iter().filter(|g| g.is_completed()).count(),
            simple: count(GoalType::Simple),
            eternal: count(GoalType::Eternal),
            checklist: count(GoalType::Checklist),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Save, turning a failure into a logged warning.
    fn persist(&mut self) -> Option<GoalError> {
        match self.save() {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("error saving goal store: {}", e);
                Some(e)
            }
        }
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Read the persisted goal list and score.
///
/// `Ok(None)` when nothing has been stored yet. A missing score next to a
/// stored goal list reads as 0.
fn read_state<S: KeyValueStorage>(
    storage: &S,
    keys: &StorageSettings,
) -> Result<Option<(Vec<Goal>, u64)>, GoalError> {
    let Some(raw_goals) = storage.get(&keys.goals_key)? else {
        return Ok(None);
    };
    let goals: Vec<Goal> = serde_json::from_str(&raw_goals)?;

    let mut seen = HashSet::new();
    for goal in &goals {
        if !seen.insert(goal.id.as_str()) {
            return Err(GoalError::Malformed(format!(
                "duplicate goal id '{}'",
                goal.id
            )));
        }
    }

    let total_score = match storage.get(&keys.score_key)? {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| GoalError::Malformed(format!("score '{}' is not a number", raw)))?,
        None => 0,
    };

    Ok(Some((goals, total_score)))
}

/// The starter set used when nothing usable is stored.
pub fn default_goals() -> Vec<Goal> {
    let seed = |id: &str, name: &str, description: &str, points: u32, kind: GoalKind| Goal {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        points,
        kind,
        created_at: Utc::now(),
    };
    vec![
        seed(
            "1",
            "Run a Marathon",
            "Complete a full marathon race",
            1000,
            GoalKind::Simple { completed: false },
        ),
        seed(
            "2",
            "Daily Scripture Study",
            "Read scriptures every day",
            100,
            GoalKind::Eternal,
        ),
        // Starts part-way through.
        seed(
            "3",
            "Temple Attendance",
            "Attend the temple 10 times",
            50,
            GoalKind::Checklist {
                target: 10,
                bonus: 500,
                progress: 3,
            },
        ),
    ]
}
