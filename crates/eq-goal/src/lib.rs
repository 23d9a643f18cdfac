//! # eq-goal
//!
//! Goal tracking and scoring for Eternal Quest.
//!
//! A [`Goal`] is one of four closed variants (simple, eternal, checklist,
//! negative), each with its own rule for how many points an event earns.
//! A [`GoalManager`] keeps goals in insertion order, accumulates a signed
//! score, and saves/loads its whole state as a flat text file.
//!
//! ## Key components
//!
//! - [`Goal`] / [`GoalKind`] — the variant set and its scoring rules
//! - [`GoalManager`] — ordered goals, score, level/progress, save/load
//! - [`codec`] — the `Score:` / `<TypeTag>:` line grammar
//! - [`Session`] — `Command` → `Outcome` dispatch with event notification
//! - [`QuestEvent`] / [`EventDispatcher`] — JSONL history of what happened
//! - [`QuestConfig`] / [`QuestSettings`] — `.quest/` layout and `config.toml`
//!
//! ## Quick Example
//!
//! ```rust
//! use eq_goal::{Goal, GoalManager};
//!
//! let mut manager = GoalManager::new();
//! manager.add_goal(Goal::checklist("Temple", "Visit the temple", 10, 3, 50).unwrap());
//! for _ in 0..3 {
//!     manager.record_event(0).unwrap();
//! }
//! assert_eq!(manager.score(), 80);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod goal;
pub mod manager;
pub mod session;

pub use codec::{SavedState, SkippedLine, UnknownTagPolicy};
pub use config::{QuestConfig, QuestSettings};
pub use error::GoalError;
pub use events::{EventDispatcher, EventRecord, LogSink, NotificationSink, QuestEvent};
pub use goal::{Goal, GoalKind};
pub use manager::{GoalManager, LoadReport, RecordedEvent};
pub use session::{Command, GoalSpec, Outcome, ScoreCard, Session};
