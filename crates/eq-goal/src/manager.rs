// manager.rs — GoalManager: the goal list, the running score, and save/load.
//
// Goals are addressed by their position in insertion order. The list is
// append-only within a session, so an index stays valid until a `load`
// replaces the whole collection.
//
// Loading parses the entire file into a `SavedState` first and only then
// swaps it in. A malformed line anywhere in the file leaves the manager
// exactly as it was.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::codec::{self, SkippedLine, UnknownTagPolicy};
use crate::error::GoalError;
use crate::goal::Goal;

/// Points needed per level.
pub const POINTS_PER_LEVEL: i64 = 1000;

/// Result of recording one event through the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedEvent {
    /// Points earned by this event (negative for penalties).
    pub points: i64,
    /// Score after applying `points`.
    pub score: i64,
    /// True only when this event moved the goal from incomplete to complete.
    pub completed: bool,
}

/// Summary of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of goals now held by the manager.
    pub goals: usize,
    /// Goal lines dropped because their type tag was not recognized.
    pub skipped: Vec<SkippedLine>,
}

/// Owns the ordered goal list and the accumulated score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalManager {
    goals: Vec<Goal>,
    score: i64,
}

impl GoalManager {
    /// An empty manager with a score of zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a goal and return its 0-based index.
    pub fn add_goal(&mut self, goal: Goal) -> usize {
        let index = self.goals.len();
        tracing::debug!(index, name = goal.name(), kind = goal.kind().label(), "goal added");
        self.goals.push(goal);
        index
    }

    /// Record one event on the goal at `index` and add its points to the score.
    pub fn record_event(&mut self, index: usize) -> Result<RecordedEvent, GoalError> {
        let count = self.goals.len();
        let goal = self
            .goals
            .get_mut(index)
            .ok_or(GoalError::InvalidIndex { index, count })?;

        // New score first: on overflow neither the goal nor the score changes.
        let score = goal
            .next_delta()
            .and_then(|delta| self.score.checked_add(delta))
            .ok_or_else(|| GoalError::ScoreOverflow {
                goal: goal.name().to_string(),
            })?;

        let was_complete = goal.is_complete();
        let points = goal.record_event()?;
        let completed = !was_complete && goal.is_complete();
        self.score = score;

        tracing::debug!(index, points, score = self.score, completed, "event recorded");
        Ok(RecordedEvent {
            points,
            score: self.score,
            completed,
        })
    }

    /// Goals paired with their 1-based ordinal, in insertion order.
    ///
    /// Borrowing iterator; call again for a fresh pass.
    pub fn display_goals(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.goals
            .iter()
            .enumerate()
            .map(|(i, goal)| (i + 1, goal.display_string()))
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, index: usize) -> Option<&Goal> {
        self.goals.get(index)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Completed levels, using floor division so a negative score sits
    /// below level zero (`-5` is level `-1`).
    pub fn level(&self) -> i64 {
        self.score.div_euclid(POINTS_PER_LEVEL)
    }

    /// Points into the current level, always in `0..1000`.
    pub fn progress(&self) -> i64 {
        self.score.rem_euclid(POINTS_PER_LEVEL)
    }

    /// Write the full state to `path`, replacing any existing content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GoalError> {
        let path = path.as_ref();
        let text = codec::encode_state(self.score, &self.goals);
        fs::write(path, text).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), goals = self.goals.len(), score = self.score, "saved goals");
        Ok(())
    }

    /// Replace the state with the contents of `path`, skipping unknown goal types.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, GoalError> {
        self.load_with(path, UnknownTagPolicy::Skip)
    }

    /// Replace the state with the contents of `path`.
    ///
    /// On any error the manager is left untouched.
    pub fn load_with(
        &mut self,
        path: impl AsRef<Path>,
        policy: UnknownTagPolicy,
    ) -> Result<LoadReport, GoalError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => GoalError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => GoalError::IoError {
                path: path.display().to_string(),
                source,
            },
        })?;

        let state = codec::decode_state(&text, policy)?;
        self.goals = state.goals;
        self.score = state.score;

        tracing::info!(
            path = %path.display(),
            goals = self.goals.len(),
            skipped = state.skipped.len(),
            score = self.score,
            "loaded goals"
        );
        Ok(LoadReport {
            goals: self.goals.len(),
            skipped: state.skipped,
        })
    }
}
