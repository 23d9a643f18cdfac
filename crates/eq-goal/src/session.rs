// session.rs — Structured command dispatch over a GoalManager.
//
// Front ends (the one-shot CLI, the interactive menu, tests) describe what
// they want as a `Command` and get back an `Outcome`. The session applies
// the command to its manager and emits the matching `QuestEvent`s. No
// terminal I/O happens here.

use std::path::PathBuf;

use crate::codec::UnknownTagPolicy;
use crate::config::{QuestConfig, QuestSettings};
use crate::error::GoalError;
use crate::events::{EventDispatcher, LogSink, QuestEvent};
use crate::goal::Goal;
use crate::manager::{GoalManager, LoadReport};

/// Constructor arguments for a new goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalSpec {
    Simple {
        name: String,
        description: String,
        points: i64,
    },
    Eternal {
        name: String,
        description: String,
        points: i64,
    },
    Checklist {
        name: String,
        description: String,
        points: i64,
        target_count: u32,
        bonus_points: i64,
    },
    Negative {
        name: String,
        description: String,
        points: i64,
    },
}

impl GoalSpec {
    /// Build the goal, rejecting reserved characters in free text.
    pub fn build(self) -> Result<Goal, GoalError> {
        match self {
            GoalSpec::Simple {
                name,
                description,
                points,
            } => Goal::simple(name, description, points),
            GoalSpec::Eternal {
                name,
                description,
                points,
            } => Goal::eternal(name, description, points),
            GoalSpec::Checklist {
                name,
                description,
                points,
                target_count,
                bonus_points,
            } => Goal::checklist(name, description, points, target_count, bonus_points),
            GoalSpec::Negative {
                name,
                description,
                points,
            } => Goal::negative(name, description, points),
        }
    }
}

/// A request against the goal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddGoal(GoalSpec),
    ListGoals,
    /// Record an event on the goal numbered `ordinal` (1-based, as listed).
    RecordEvent { ordinal: usize },
    ShowScore,
    Save { path: PathBuf },
    Load { path: PathBuf },
}

impl Command {
    /// Whether running this command changes the in-memory state.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::AddGoal(_) | Command::RecordEvent { .. } | Command::Load { .. }
        )
    }
}

/// Score with its derived level and progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreCard {
    pub score: i64,
    pub level: i64,
    pub progress: i64,
}

/// The result of a successfully executed [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    GoalAdded {
        ordinal: usize,
    },
    Goals(Vec<(usize, String)>),
    EventRecorded {
        ordinal: usize,
        name: String,
        points: i64,
        score: i64,
        completed: bool,
    },
    Score(ScoreCard),
    Saved {
        path: PathBuf,
        goals: usize,
    },
    Loaded {
        path: PathBuf,
        report: LoadReport,
    },
}

/// A goal manager plus the event sinks and load policy that go with it.
pub struct Session {
    manager: GoalManager,
    dispatcher: EventDispatcher,
    policy: UnknownTagPolicy,
}

impl Session {
    /// A session with no event sinks and lenient loading.
    pub fn new(manager: GoalManager) -> Self {
        Self {
            manager,
            dispatcher: EventDispatcher::new(),
            policy: UnknownTagPolicy::Skip,
        }
    }

    /// A session wired up from quest settings: event log sink and load policy.
    pub fn from_config(config: &QuestConfig, settings: &QuestSettings) -> Self {
        let mut dispatcher = EventDispatcher::new();
        if settings.events.enabled {
            dispatcher.add_sink(Box::new(LogSink::new(&config.events_log)));
        }
        Self::new(GoalManager::new())
            .with_dispatcher(dispatcher)
            .with_policy(settings.load.unknown_tags)
    }

    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn with_policy(mut self, policy: UnknownTagPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn manager(&self) -> &GoalManager {
        &self.manager
    }

    pub fn scorecard(&self) -> ScoreCard {
        ScoreCard {
            score: self.manager.score(),
            level: self.manager.level(),
            progress: self.manager.progress(),
        }
    }

    /// Apply a command. On error the state is unchanged.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, GoalError> {
        match command {
            Command::AddGoal(spec) => {
                let goal = spec.build()?;
                let name = goal.name().to_string();
                let kind = goal.kind().label();
                let ordinal = self.manager.add_goal(goal) + 1;
                self.dispatcher
                    .dispatch(QuestEvent::goal_added(ordinal, &name, kind));
                Ok(Outcome::GoalAdded { ordinal })
            }

            Command::ListGoals => Ok(Outcome::Goals(self.manager.display_goals().collect())),

            Command::RecordEvent { ordinal } => self.record(ordinal),

            Command::ShowScore => Ok(Outcome::Score(self.scorecard())),

            Command::Save { path } => {
                self.manager.save(&path)?;
                let goals = self.manager.len();
                self.dispatcher.dispatch(QuestEvent::state_saved(
                    &path,
                    goals,
                    self.manager.score(),
                ));
                Ok(Outcome::Saved { path, goals })
            }

            Command::Load { path } => {
                let report = self.manager.load_with(&path, self.policy)?;
                self.dispatcher.dispatch(QuestEvent::state_loaded(
                    &path,
                    report.goals,
                    report.skipped.clone(),
                    self.manager.score(),
                ));
                Ok(Outcome::Loaded { path, report })
            }
        }
    }

    fn record(&mut self, ordinal: usize) -> Result<Outcome, GoalError> {
        let count = self.manager.len();
        let invalid = GoalError::InvalidOrdinal { ordinal, count };
        let index = ordinal.checked_sub(1).ok_or(invalid)?;

        let recorded = self.manager.record_event(index).map_err(|e| match e {
            GoalError::InvalidIndex { .. } => GoalError::InvalidOrdinal { ordinal, count },
            other => other,
        })?;
        let name = self
            .manager
            .get(index)
            .map(|g| g.name().to_string())
            .unwrap_or_default();

        self.dispatcher.dispatch(QuestEvent::event_recorded(
            ordinal,
            &name,
            recorded.points,
            recorded.score,
        ));
        if recorded.completed {
            self.dispatcher
                .dispatch(QuestEvent::goal_completed(ordinal, &name));
        }

        Ok(Outcome::EventRecorded {
            ordinal,
            name,
            points: recorded.points,
            score: recorded.score,
            completed: recorded.completed,
        })
    }
}
