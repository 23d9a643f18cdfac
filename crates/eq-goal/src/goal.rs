// goal.rs — Goal: one trackable behavior and its scoring rule.
//
// Every goal shares a name, a description and a base point value. What
// happens when an event is recorded depends on the variant:
//   Simple    — pays out once, then stays complete
//   Eternal   — pays out every time, never completes
//   Checklist — pays out every time, plus a one-time bonus on the target hit
//   Negative  — costs points every time, never completes

use std::fmt;

use crate::codec;
use crate::error::GoalError;

/// Characters the save format splits on. Free-text fields may not contain them.
pub const RESERVED_CHARS: [char; 4] = [',', ':', '\n', '\r'];

/// Variant-specific state of a goal.
///
/// Closed set; every `match` on it is exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalKind {
    /// Completed by a single event.
    Simple { is_complete: bool },

    /// A habit with no end state.
    Eternal,

    /// Completed after `target_count` events; `bonus_points` paid on the
    /// event that reaches the target.
    Checklist {
        target_count: u32,
        current_count: u32,
        bonus_points: i64,
    },

    /// A bad habit: each event is a penalty.
    Negative,
}

impl GoalKind {
    /// Short lowercase name of the variant, used in listings and logs.
    pub fn label(&self) -> &'static str {
        match self {
            GoalKind::Simple { .. } => "simple",
            GoalKind::Eternal => "eternal",
            GoalKind::Checklist { .. } => "checklist",
            GoalKind::Negative => "negative",
        }
    }
}

/// A goal tracked by the [`GoalManager`](crate::manager::GoalManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    name: String,
    description: String,
    points: i64,
    kind: GoalKind,
}

impl Goal {
    /// A goal that is done after one event.
    pub fn simple(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
    ) -> Result<Self, GoalError> {
        Self::from_parts(
            name.into(),
            description.into(),
            points,
            GoalKind::Simple { is_complete: false },
        )
    }

    /// A goal that is never done and pays `points` per event.
    pub fn eternal(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
    ) -> Result<Self, GoalError> {
        Self::from_parts(name.into(), description.into(), points, GoalKind::Eternal)
    }

    /// A goal that must be repeated `target_count` times.
    pub fn checklist(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
        target_count: u32,
        bonus_points: i64,
    ) -> Result<Self, GoalError> {
        Self::from_parts(
            name.into(),
            description.into(),
            points,
            GoalKind::Checklist {
                target_count,
                current_count: 0,
                bonus_points,
            },
        )
    }

    /// A habit to avoid; each event subtracts `points`.
    pub fn negative(
        name: impl Into<String>,
        description: impl Into<String>,
        points: i64,
    ) -> Result<Self, GoalError> {
        Self::from_parts(name.into(), description.into(), points, GoalKind::Negative)
    }

    /// Build a goal with explicit progress state. Used when decoding saves.
    pub(crate) fn from_parts(
        name: String,
        description: String,
        points: i64,
        kind: GoalKind,
    ) -> Result<Self, GoalError> {
        check_free_text("name", &name)?;
        check_free_text("description", &description)?;
        Ok(Self {
            name,
            description,
            points,
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Base points per event (before bonus, before the negative sign).
    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn kind(&self) -> &GoalKind {
        &self.kind
    }

    /// Point delta the next event would earn, without recording it.
    ///
    /// `None` when the delta itself does not fit in an `i64`.
    pub fn next_delta(&self) -> Option<i64> {
        match &self.kind {
            GoalKind::Simple { is_complete: true } => Some(0),
            GoalKind::Simple { is_complete: false } | GoalKind::Eternal => Some(self.points),
            GoalKind::Checklist {
                target_count,
                current_count,
                bonus_points,
            } => {
                if reaches_target(*current_count, *target_count) {
                    self.points.checked_add(*bonus_points)
                } else {
                    Some(self.points)
                }
            }
            GoalKind::Negative => self.points.checked_neg(),
        }
    }

    /// Record one occurrence and return the point delta it earned.
    ///
    /// A completed Simple goal earns nothing; a Checklist goal keeps
    /// counting past its target but pays the bonus only once. Fails with
    /// `ScoreOverflow`, leaving the goal untouched, when the delta does not
    /// fit in an `i64`.
    pub fn record_event(&mut self) -> Result<i64, GoalError> {
        let delta = self.next_delta().ok_or_else(|| GoalError::ScoreOverflow {
            goal: self.name.clone(),
        })?;
        match &mut self.kind {
            GoalKind::Simple { is_complete } => *is_complete = true,
            // The counter is uncapped; it only stops moving at u32::MAX.
            GoalKind::Checklist { current_count, .. } => {
                *current_count = current_count.saturating_add(1);
            }
            GoalKind::Eternal | GoalKind::Negative => {}
        }
        Ok(delta)
    }

    /// Whether the goal has reached its end state.
    pub fn is_complete(&self) -> bool {
        match &self.kind {
            GoalKind::Simple { is_complete } => *is_complete,
            GoalKind::Checklist {
                target_count,
                current_count,
                ..
            } => current_count >= target_count,
            GoalKind::Eternal | GoalKind::Negative => false,
        }
    }

    /// Human-readable line: completion marker, name, description, progress.
    pub fn display_string(&self) -> String {
        self.to_string()
    }

    /// Single-line save-file form of this goal.
    pub fn encode(&self) -> String {
        codec::encode_goal(self)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_complete() { "X" } else { " " };
        write!(f, "[{}] {} ({})", marker, self.name, self.description)?;
        match &self.kind {
            GoalKind::Checklist {
                target_count,
                current_count,
                ..
            } => write!(
                f,
                " -- Completed {}/{} times",
                current_count, target_count
            ),
            GoalKind::Negative => write!(f, " - Lose {} points each time", self.points),
            GoalKind::Simple { .. } | GoalKind::Eternal => Ok(()),
        }
    }
}

/// True when the event taking the count from `before` lands exactly on the target.
fn reaches_target(before: u32, target: u32) -> bool {
    before < target && before + 1 == target
}

fn check_free_text(field: &'static str, value: &str) -> Result<(), GoalError> {
    match value.chars().find(|c| RESERVED_CHARS.contains(c)) {
        Some(character) => Err(GoalError::ReservedCharacter { field, character }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_goal_pays_once() {
        let mut goal = Goal::simple("Run", "Finish a marathon", 10).unwrap();
        assert!(!goal.is_complete());

        assert_eq!(goal.record_event().unwrap(), 10);
        assert!(goal.is_complete());

        for _ in 0..3 {
            assert_eq!(goal.record_event().unwrap(), 0);
            assert!(goal.is_complete());
        }
    }

    #[test]
    fn checklist_goal_pays_bonus_on_target() {
        let mut goal = Goal::checklist("Temple", "Visit the temple", 10, 3, 50).unwrap();

        assert_eq!(goal.record_event().unwrap(), 10);
        assert!(!goal.is_complete());
        assert_eq!(goal.record_event().unwrap(), 10);
        assert!(!goal.is_complete());
        assert_eq!(goal.record_event().unwrap(), 60);
        assert!(goal.is_complete());
    }

    #[test]
    fn checklist_goal_keeps_counting_without_second_bonus() {
        let mut goal = Goal::checklist("Water", "Eight glasses", 5, 2, 70).unwrap();
        goal.record_event().unwrap();
        goal.record_event().unwrap();

        assert_eq!(goal.record_event().unwrap(), 5);
        assert_eq!(goal.record_event().unwrap(), 5);
        assert!(goal.is_complete());
        assert_eq!(
            goal.kind(),
            &GoalKind::Checklist {
                target_count: 2,
                current_count: 4,
                bonus_points: 70,
            }
        );
    }

    #[test]
    fn checklist_bonus_paid_once_when_counter_saturates() {
        let mut goal = Goal::from_parts(
            "a".into(),
            "b".into(),
            10,
            GoalKind::Checklist {
                target_count: u32::MAX,
                current_count: u32::MAX - 1,
                bonus_points: 50,
            },
        )
        .unwrap();

        let deltas: Vec<i64> = (0..3).map(|_| goal.record_event().unwrap()).collect();
        assert_eq!(deltas, vec![60, 10, 10]);
        assert!(goal.is_complete());
    }

    #[test]
    fn overflowing_delta_is_an_error_and_leaves_goal_alone() {
        let mut negative = Goal::negative("a", "b", i64::MIN).unwrap();
        assert_eq!(negative.next_delta(), None);
        let err = negative.record_event().unwrap_err();
        assert!(matches!(err, GoalError::ScoreOverflow { ref goal } if goal == "a"));

        let mut checklist = Goal::checklist("c", "d", i64::MAX, 1, 1).unwrap();
        let before = checklist.clone();
        assert!(matches!(
            checklist.record_event(),
            Err(GoalError::ScoreOverflow { .. })
        ));
        assert_eq!(checklist, before);
    }

    #[test]
    fn next_delta_matches_recorded_points() {
        let mut goal = Goal::checklist("Temple", "Visit", 10, 2, 50).unwrap();
        for expected in [10, 60, 10] {
            assert_eq!(goal.next_delta(), Some(expected));
            assert_eq!(goal.record_event().unwrap(), expected);
        }
    }

    #[test]
    fn negative_goal_always_costs_points() {
        let mut goal = Goal::negative("Games", "Avoid video games", 20).unwrap();
        for _ in 0..3 {
            assert_eq!(goal.record_event().unwrap(), -20);
            assert!(!goal.is_complete());
        }
    }

    #[test]
    fn eternal_goal_always_pays() {
        let mut goal = Goal::eternal("Read", "Daily study", 5).unwrap();
        for _ in 0..3 {
            assert_eq!(goal.record_event().unwrap(), 5);
            assert!(!goal.is_complete());
        }
    }

    #[test]
    fn display_strings_per_variant() {
        let mut simple = Goal::simple("Run", "Marathon", 1000).unwrap();
        assert_eq!(simple.display_string(), "[ ] Run (Marathon)");
        simple.record_event().unwrap();
        assert_eq!(simple.display_string(), "[X] Run (Marathon)");

        let eternal = Goal::eternal("Read", "Daily study", 100).unwrap();
        assert_eq!(eternal.display_string(), "[ ] Read (Daily study)");

        let mut checklist = Goal::checklist("Temple", "Visit", 50, 1, 500).unwrap();
        assert_eq!(
            checklist.display_string(),
            "[ ] Temple (Visit) -- Completed 0/1 times"
        );
        checklist.record_event().unwrap();
        assert_eq!(
            checklist.display_string(),
            "[X] Temple (Visit) -- Completed 1/1 times"
        );

        let negative = Goal::negative("Games", "Avoid", 50).unwrap();
        assert_eq!(
            negative.display_string(),
            "[ ] Games (Avoid) - Lose 50 points each time"
        );
    }

    #[test]
    fn reserved_characters_are_rejected() {
        let err = Goal::simple("a,b", "desc", 1).unwrap_err();
        assert!(matches!(
            err,
            GoalError::ReservedCharacter {
                field: "name",
                character: ','
            }
        ));

        let err = Goal::eternal("name", "time: 6am", 1).unwrap_err();
        assert!(matches!(
            err,
            GoalError::ReservedCharacter {
                field: "description",
                character: ':'
            }
        ));

        assert!(Goal::negative("multi\nline", "desc", 1).is_err());
    }

    #[test]
    fn encode_matches_save_format() {
        let goal = Goal::eternal("Read", "Daily study", 5).unwrap();
        assert_eq!(goal.encode(), "EternalGoal:Read,Daily study,5");
    }

    #[test]
    fn kind_labels() {
        assert_eq!(Goal::simple("a", "b", 1).unwrap().kind().label(), "simple");
        assert_eq!(
            Goal::checklist("a", "b", 1, 2, 3).unwrap().kind().label(),
            "checklist"
        );
    }
}
