// goal.rs — Goal: a trackable objective and its scoring rules.
//
// A goal is one of three kinds:
//   Simple:    awards its points once, on the first recording
//   Eternal:   never completes, every recording re-awards its points
//   Checklist: needs `target` recordings, the last one adds a bonus
//
// Per-kind state lives inside the `GoalKind` variant, so a Simple goal has no
// progress counter and a Checklist's completion flag is derived from
// `progress == target` rather than stored separately.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GoalError;

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_DESCRIPTION_LEN: usize = 10;
pub const MIN_CHECKLIST_TARGET: u32 = 2;

/// The kind of a goal, without any per-kind state.
///
/// Used for input (`NewGoal`), filtering, and as the `type` tag of the
/// persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Simple,
    Eternal,
    Checklist,
}

impl GoalType {
    pub const ALL: [GoalType; 3] = [GoalType::Simple, GoalType::Eternal, GoalType::Checklist];

    /// Capitalised name used in listings ("Checklist Goal").
    pub fn title(&self) -> &'static str {
        match self {
            GoalType::Simple => "Simple",
            GoalType::Eternal => "Eternal",
            GoalType::Checklist => "Checklist",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalType::Simple => write!(f, "simple"),
            GoalType::Eternal => write!(f, "eternal"),
            GoalType::Checklist => write!(f, "checklist"),
        }
    }
}

impl FromStr for GoalType {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(GoalType::Simple),
            "eternal" => Ok(GoalType::Eternal),
            "checklist" => Ok(GoalType::Checklist),
            other => Err(GoalError::validation(
                "type",
                format!("unknown goal type '{}' (expected simple, eternal or checklist)", other),
            )),
        }
    }
}

/// Per-kind goal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalKind {
    /// Completes on the first recording, never again.
    Simple { completed: bool },

    /// Never completes.
    Eternal,

    /// Completes when `progress` reaches `target`.
    Checklist {
        target: u32,
        bonus: u32,
        progress: u32,
    },
}

impl GoalKind {
    pub fn goal_type(&self) -> GoalType {
        match self {
            GoalKind::Simple { .. } => GoalType::Simple,
            GoalKind::Eternal => GoalType::Eternal,
            GoalKind::Checklist { .. } => GoalType::Checklist,
        }
    }
}

/// User input for creating a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub name: String,
    pub description: String,
    pub goal_type: GoalType,
    pub points: u32,
    /// Required for checklist goals only.
    pub target: Option<u32>,
    /// Required for checklist goals only.
    pub bonus: Option<u32>,
}

impl NewGoal {
    pub fn simple(name: impl Into<String>, description: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            goal_type: GoalType::Simple,
            points,
            target: None,
            bonus: None,
        }
    }

    pub fn eternal(name: impl Into<String>, description: impl Into<String>, points: u32) -> Self {
        Self {
            goal_type: GoalType::Eternal,
            ..Self::simple(name, description, points)
        }
    }

    pub fn checklist(
        name: impl Into<String>,
        description: impl Into<String>,
        points: u32,
        target: u32,
        bonus: u32,
    ) -> Self {
        Self {
            goal_type: GoalType::Checklist,
            target: Some(target),
            bonus: Some(bonus),
            ..Self::simple(name, description, points)
        }
    }

    /// Check the input and build the initial kind state.
    ///
    /// Fields are checked in form order (name, description, points, target,
    /// bonus) and the first failure is returned.
    pub fn validate(&self) -> Result<GoalKind, GoalError> {
        if self.name.chars().count() < MIN_NAME_LEN {
            return Err(GoalError::validation(
                "name",
                format!("Name must be at least {} characters", MIN_NAME_LEN),
            ));
        }
        if self.description.chars().count() < MIN_DESCRIPTION_LEN {
            return Err(GoalError::validation(
                "description",
                format!(
                    "Description must be at least {} characters",
                    MIN_DESCRIPTION_LEN
                ),
            ));
        }
        if self.points < 1 {
            return Err(GoalError::validation("points", "Points must be at least 1"));
        }

        match self.goal_type {
            GoalType::Simple => Ok(GoalKind::Simple { completed: false }),
            GoalType::Eternal => Ok(GoalKind::Eternal),
            GoalType::Checklist => {
                let target = checklist_target(self.target)?;
                let bonus = checklist_bonus(self.bonus)?;
                Ok(GoalKind::Checklist {
                    target,
                    bonus,
                    progress: 0,
                })
            }
        }
    }
}

fn checklist_target(target: Option<u32>) -> Result<u32, GoalError> {
    match target {
        Some(t) if t >= MIN_CHECKLIST_TARGET => Ok(t),
        _ => Err(GoalError::validation(
            "target",
            format!(
                "Target must be at least {} for checklist goals",
                MIN_CHECKLIST_TARGET
            ),
        )),
    }
}

fn checklist_bonus(bonus: Option<u32>) -> Result<u32, GoalError> {
    match bonus {
        Some(b) if b >= 1 => Ok(b),
        _ => Err(GoalError::validation("bonus", "Bonus must be at least 1")),
    }
}

/// A trackable goal.
///
/// Serializes to the flat record layout used by the key-value storage;
/// deserialization validates the record against its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GoalRecord", into = "GoalRecord")]
pub struct Goal {
    /// Unique identifier within the store.
    pub id: String,

    pub name: String,

    pub description: String,

    /// Base points awarded per successful recording.
    pub points: u32,

    /// Kind and per-kind state.
    pub kind: GoalKind,

    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Build a goal from validated input, with zeroed completion state.
    pub fn new(id: impl Into<String>, input: &NewGoal) -> Result<Self, GoalError> {
        let kind = input.validate()?;
        Ok(Self {
            id: id.into(),
            name: input.name.clone(),
            description: input.description.clone(),
            points: input.points,
            kind,
            created_at: Utc::now(),
        })
    }

    pub fn goal_type(&self) -> GoalType {
        self.kind.goal_type()
    }

    pub fn is_completed(&self) -> bool {
        match self.kind {
            GoalKind::Simple { completed } => completed,
            GoalKind::Eternal => false,
            GoalKind::Checklist {
                target, progress, ..
            } => progress == target,
        }
    }

    /// Recordings so far. Always 0 for non-checklist goals.
    pub fn progress(&self) -> u32 {
        match self.kind {
            GoalKind::Checklist { progress, .. } => progress,
            _ => 0,
        }
    }

    pub fn target(&self) -> Option<u32> {
        match self.kind {
            GoalKind::Checklist { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn bonus(&self) -> Option<u32> {
        match self.kind {
            GoalKind::Checklist { bonus, .. } => Some(bonus),
            _ => None,
        }
    }

    /// Apply one recording event and return the points it awards.
    ///
    /// Returns 0 when the goal is already complete.
    pub fn record(&mut self) -> u32 {
        let points = self.points;
        match &mut self.kind {
            GoalKind::Eternal => points,
            GoalKind::Simple { completed } => {
                if *completed {
                    return 0;
                }
                *completed = true;
                points
            }
            GoalKind::Checklist {
                target,
                bonus,
                progress,
            } => {
                if *progress >= *target {
                    return 0;
                }
                *progress += 1;
                if *progress == *target {
                    points.saturating_add(*bonus)
                } else {
                    points
                }
            }
        }
    }

    /// Human-readable progress: "3/10", "Complete", "Incomplete" or "Eternal".
    pub fn progress_label(&self) -> String {
        match self.kind {
            GoalKind::Checklist {
                target, progress, ..
            } => format!("{}/{}", progress, target),
            GoalKind::Simple { completed: true } => "Complete".to_string(),
            GoalKind::Simple { completed: false } => "Incomplete".to_string(),
            GoalKind::Eternal => "Eternal".to_string(),
        }
    }

    /// Points column text: "50 + 500 bonus" for checklists, "50" otherwise.
    pub fn points_label(&self) -> String {
        match self.bonus() {
            Some(bonus) => format!("{} + {} bonus", self.points, bonus),
            None => self.points.to_string(),
        }
    }
}

/// Flat persisted form of a goal.
///
/// Every kind shares one field set; `target`/`bonus` are null and
/// `progress` is 0 for kinds that don't use them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalRecord {
    id: String,
    name: String,
    description: String,
    #[serde(rename = "type")]
    goal_type: GoalType,
    points: u32,
    #[serde(default)]
    target: Option<u32>,
    #[serde(default)]
    bonus: Option<u32>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    progress: u32,
    date_created: DateTime<Utc>,
}

impl TryFrom<GoalRecord> for Goal {
    type Error = GoalError;

    fn try_from(record: GoalRecord) -> Result<Self, Self::Error> {
        let malformed = |why: &str| GoalError::Malformed(format!("goal '{}': {}", record.id, why));

        if record.id.is_empty() {
            return Err(GoalError::Malformed("goal with empty id".to_string()));
        }
        if record.points < 1 {
            return Err(malformed("points must be at least 1"));
        }

        let kind = match record.goal_type {
            GoalType::Simple => GoalKind::Simple {
                completed: record.completed,
            },
            GoalType::Eternal => {
                if record.completed {
                    return Err(malformed("eternal goals never complete"));
                }
                GoalKind::Eternal
            }
            GoalType::Checklist => {
                let target =
                    checklist_target(record.target).map_err(|e| malformed(&e.to_string()))?;
                let bonus = checklist_bonus(record.bonus).map_err(|e| malformed(&e.to_string()))?;
                if record.progress > target {
                    return Err(malformed("progress exceeds target"));
                }
                if record.completed != (record.progress == target) {
                    return Err(malformed("completion flag disagrees with progress"));
                }
                GoalKind::Checklist {
                    target,
                    bonus,
                    progress: record.progress,
                }
            }
        };

        Ok(Goal {
            id: record.id,
            name: record.name,
            description: record.description,
            points: record.points,
            kind,
            created_at: record.date_created,
        })
    }
}

impl From<Goal> for GoalRecord {
    fn from(goal: Goal) -> Self {
        let completed = goal.is_completed();
        let goal_type = goal.goal_type();
        let (target, bonus, progress) = match goal.kind {
            GoalKind::Checklist {
                target,
                bonus,
                progress,
            } => (Some(target), Some(bonus), progress),
            _ => (None, None, 0),
        };
        GoalRecord {
            id: goal.id,
            name: goal.name,
            description: goal.description,
            goal_type,
            points: goal.points,
            target,
            bonus,
            completed,
            progress,
            date_created: goal.created_at,
        }
    }
}
