//! # eq-goal
//!
//! Goal tracking with scoring and key-value persistence for Eternal Quest.
//!
//! Users define goals of three kinds and record progress against them; each
//! recording may award points toward a cumulative score. The whole state is
//! mirrored to key-value storage after every change.
//!
//! ## Key components
//!
//! - [`Goal`] / [`GoalKind`] — a goal and its per-kind state (Simple,
//!   Eternal, Checklist) with the scoring rules in [`Goal::record`]
//! - [`GoalStore`] — ordered goal list plus total score, with
//!   create / record / delete and load / save
//! - [`KeyValueStorage`] — storage seam ([`FileStorage`], [`MemoryStorage`])
//! - [`QuestEvent`] / [`EventDispatcher`] — events emitted on every mutation
//! - [`QuestConfig`] — `.quest/` project layout and TOML settings

pub mod config;
pub mod error;
pub mod events;
pub mod goal;
pub mod storage;
pub mod store;

pub use config::{QuestConfig, QuestSettings};
pub use error::GoalError;
pub use events::{EventDispatcher, LogSink, NotificationSink, QuestEvent};
pub use goal::{Goal, GoalKind, GoalType, NewGoal};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{Award, GoalStore, Outcome, Summary};
