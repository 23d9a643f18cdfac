// events.rs — Quest events and notification dispatch.
//
// A session emits an event whenever the goal state changes in a way a
// user might want a record of: goals added, events recorded, goals
// completed, saves and loads. Events carry no time of their own; the
// dispatcher stamps each one into an `EventRecord` so every sink sees the
// same timestamp for the same event.
//
// The built-in `LogSink` appends records as JSON lines, giving a history
// that survives across saves and can be read back with `LogSink::history`.
// A failing sink is logged and counted, never propagated, so a broken log
// file never blocks recording progress.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::SkippedLine;
use crate::error::GoalError;

/// Events emitted by a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum QuestEvent {
    /// A goal was appended to the list.
    GoalAdded {
        ordinal: usize,
        name: String,
        kind: String,
    },

    /// An event was recorded against a goal.
    EventRecorded {
        ordinal: usize,
        name: String,
        points: i64,
        score: i64,
    },

    /// A goal reached its end state on this event.
    GoalCompleted { ordinal: usize, name: String },

    /// The state was written to a save file.
    StateSaved {
        path: String,
        goals: usize,
        score: i64,
    },

    /// The state was replaced from a save file.
    StateLoaded {
        path: String,
        goals: usize,
        /// Lines dropped for carrying an unknown type tag.
        skipped: Vec<SkippedLine>,
        score: i64,
    },
}

impl QuestEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            QuestEvent::GoalAdded { .. } => "goal_added",
            QuestEvent::EventRecorded { .. } => "event_recorded",
            QuestEvent::GoalCompleted { .. } => "goal_completed",
            QuestEvent::StateSaved { .. } => "state_saved",
            QuestEvent::StateLoaded { .. } => "state_loaded",
        }
    }

    pub fn goal_added(ordinal: usize, name: &str, kind: &str) -> Self {
        QuestEvent::GoalAdded {
            ordinal,
            name: name.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn event_recorded(ordinal: usize, name: &str, points: i64, score: i64) -> Self {
        QuestEvent::EventRecorded {
            ordinal,
            name: name.to_string(),
            points,
            score,
        }
    }

    pub fn goal_completed(ordinal: usize, name: &str) -> Self {
        QuestEvent::GoalCompleted {
            ordinal,
            name: name.to_string(),
        }
    }

    pub fn state_saved(path: &Path, goals: usize, score: i64) -> Self {
        QuestEvent::StateSaved {
            path: path.display().to_string(),
            goals,
            score,
        }
    }

    pub fn state_loaded(path: &Path, goals: usize, skipped: Vec<SkippedLine>, score: i64) -> Self {
        QuestEvent::StateLoaded {
            path: path.display().to_string(),
            goals,
            skipped,
            score,
        }
    }
}

/// One line of the event log: a quest event plus the time it was dispatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: QuestEvent,
}

/// Receives stamped quest events.
pub trait NotificationSink: Send {
    /// Handle a record. Errors are logged by the dispatcher, never propagated.
    fn send(&self, record: &EventRecord) -> Result<(), GoalError>;
}

/// Appends event records as JSONL to a file, creating its directory on first use.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record written so far, oldest first. A missing log is an empty history.
    pub fn history(&self) -> Result<Vec<EventRecord>, GoalError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| self.io_error(source))?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    fn io_error(&self, source: std::io::Error) -> GoalError {
        GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, record: &EventRecord) -> Result<(), GoalError> {
        let json = serde_json::to_string(record)?;
        self.append_line(&json)
            .map_err(|source| self.io_error(source))
    }
}

/// Stamps events and fans them out to every registered sink.
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    /// A dispatcher with no sinks; dispatching is a no-op.
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Stamp `event` with the current time and deliver it.
    pub fn dispatch(&self, event: QuestEvent) -> usize {
        self.dispatch_at(event, Utc::now())
    }

    /// Deliver `event` stamped with `timestamp`. Returns how many sinks failed.
    pub fn dispatch_at(&self, event: QuestEvent, timestamp: DateTime<Utc>) -> usize {
        let record = EventRecord { timestamp, event };
        let mut failed = 0;
        for sink in &self.sinks {
            if let Err(e) = sink.send(&record) {
                failed += 1;
                tracing::warn!(event = record.event.event_type(), "notification sink error: {}", e);
            }
        }
        failed
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn record_serializes_flat_with_event_type() {
        let record = EventRecord {
            timestamp: noon(),
            event: QuestEvent::event_recorded(2, "Read", 100, 1100),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"event_type\":\"event_recorded\""));
        assert!(json.contains("\"timestamp\":\"2024-03-01T12:00:00Z\""));

        let restored: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn state_loaded_carries_skipped_lines() {
        let skipped = vec![SkippedLine {
            line: 4,
            tag: "StretchGoal".to_string(),
        }];
        let record = EventRecord {
            timestamp: noon(),
            event: QuestEvent::state_loaded(Path::new("goals.txt"), 2, skipped.clone(), 300),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"tag\":\"StretchGoal\""));

        let restored: EventRecord = serde_json::from_str(&json).unwrap();
        match restored.event {
            QuestEvent::StateLoaded { skipped: got, .. } => assert_eq!(got, skipped),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn log_sink_appends_and_reads_history() {
        let dir = tempdir().unwrap();
        let sink = LogSink::new(dir.path().join("nested").join("events.jsonl"));
        assert!(sink.history().unwrap().is_empty());

        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_sink(Box::new(LogSink::new(sink.path())));
        dispatcher.dispatch_at(QuestEvent::goal_added(1, "Run", "simple"), noon());
        dispatcher.dispatch_at(QuestEvent::goal_completed(1, "Run"), noon());

        let history = sink.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].event, QuestEvent::goal_completed(1, "Run"));
        assert_eq!(history[1].timestamp, noon());
    }

    #[test]
    fn every_sink_sees_the_same_timestamp() {
        let dir = tempdir().unwrap();
        let first = LogSink::new(dir.path().join("sink1.jsonl"));
        let second = LogSink::new(dir.path().join("sink2.jsonl"));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_sink(Box::new(LogSink::new(first.path())));
        dispatcher.add_sink(Box::new(LogSink::new(second.path())));
        assert_eq!(dispatcher.sink_count(), 2);

        assert_eq!(dispatcher.dispatch(QuestEvent::goal_added(1, "Run", "simple")), 0);

        let a = first.history().unwrap();
        let b = second.history().unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn failing_sink_is_counted_and_does_not_stop_others() {
        let dir = tempdir().unwrap();
        // A directory where the log file should be makes the open fail.
        let blocked = dir.path().join("blocked");
        fs::create_dir_all(&blocked).unwrap();
        let good = LogSink::new(dir.path().join("good.jsonl"));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_sink(Box::new(LogSink::new(&blocked)));
        dispatcher.add_sink(Box::new(LogSink::new(good.path())));

        let failed = dispatcher.dispatch_at(QuestEvent::goal_completed(1, "Run"), noon());
        assert_eq!(failed, 1);
        assert_eq!(good.history().unwrap().len(), 1);
    }

    #[test]
    fn event_type_names() {
        let path = Path::new("goals.txt");
        assert_eq!(QuestEvent::state_saved(path, 1, 0).event_type(), "state_saved");
        assert_eq!(
            QuestEvent::state_loaded(path, 1, Vec::new(), 0).event_type(),
            "state_loaded"
        );
    }
}
