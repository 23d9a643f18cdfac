// codec.rs — Line grammar for the Eternal Quest save file.
//
// A save file is UTF-8 text, one record per line:
//
//   Score:<integer>
//   <TypeTag>:<field>,<field>,...
//
//   SimpleGoal:    name,description,points,isComplete
//   EternalGoal:   name,description,points
//   ChecklistGoal: name,description,points,targetCount,bonusPoints,currentCount
//   NegativeGoal:  name,description,points
//
// Fields are split literally on ',' and the tag on the first ':'. Goals
// refuse free text containing either, so every encoded line decodes back to
// the same goal. Blank lines after the score line are ignored.

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal::{Goal, GoalKind};

pub const SCORE_TAG: &str = "Score";
pub const SIMPLE_TAG: &str = "SimpleGoal";
pub const ETERNAL_TAG: &str = "EternalGoal";
pub const CHECKLIST_TAG: &str = "ChecklistGoal";
pub const NEGATIVE_TAG: &str = "NegativeGoal";

/// What to do with a goal line whose type tag matches no variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTagPolicy {
    /// Drop the line, record it in [`SavedState::skipped`], keep going.
    #[default]
    Skip,
    /// Fail the whole decode with [`GoalError::UnknownTypeTag`].
    Reject,
}

/// A goal line that was dropped because its tag was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 1-based line number in the save file.
    pub line: usize,
    pub tag: String,
}

/// Fully decoded save file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedState {
    pub score: i64,
    pub goals: Vec<Goal>,
    pub skipped: Vec<SkippedLine>,
}

/// One decoded goal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedLine {
    Goal(Goal),
    Unknown { tag: String },
}

/// Encode a goal as a single save-file line (no trailing newline).
pub fn encode_goal(goal: &Goal) -> String {
    let head = format!("{},{},{}", goal.name(), goal.description(), goal.points());
    match goal.kind() {
        GoalKind::Simple { is_complete } => format!("{SIMPLE_TAG}:{head},{is_complete}"),
        GoalKind::Eternal => format!("{ETERNAL_TAG}:{head}"),
        GoalKind::Checklist {
            target_count,
            current_count,
            bonus_points,
        } => format!("{CHECKLIST_TAG}:{head},{target_count},{bonus_points},{current_count}"),
        GoalKind::Negative => format!("{NEGATIVE_TAG}:{head}"),
    }
}

/// Encode a whole manager state: the score line, then one line per goal.
pub fn encode_state(score: i64, goals: &[Goal]) -> String {
    let mut out = format!("{SCORE_TAG}:{score}\n");
    for goal in goals {
        out.push_str(&encode_goal(goal));
        out.push('\n');
    }
    out
}

/// Decode a whole save file.
///
/// Nothing is returned unless every line parses; the caller never sees a
/// partially decoded state.
pub fn decode_state(text: &str, policy: UnknownTagPolicy) -> Result<SavedState, GoalError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let score = match lines.next() {
        Some((line_no, line)) => decode_score(line_no, line)?,
        None => return Err(GoalError::malformed(1, "missing score line")),
    };

    let mut goals = Vec::new();
    let mut skipped = Vec::new();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        match decode_goal(line_no, line)? {
            DecodedLine::Goal(goal) => goals.push(goal),
            DecodedLine::Unknown { tag } => match policy {
                UnknownTagPolicy::Skip => {
                    tracing::warn!(line = line_no, tag = %tag, "skipping goal line with unknown type");
                    skipped.push(SkippedLine { line: line_no, tag });
                }
                UnknownTagPolicy::Reject => {
                    return Err(GoalError::UnknownTypeTag { line: line_no, tag });
                }
            },
        }
    }

    Ok(SavedState {
        score,
        goals,
        skipped,
    })
}

/// Decode the `Score:<integer>` header line.
pub fn decode_score(line_no: usize, line: &str) -> Result<i64, GoalError> {
    let (tag, value) = line
        .split_once(':')
        .ok_or_else(|| GoalError::malformed(line_no, "expected 'Score:<integer>'"))?;
    if tag != SCORE_TAG {
        return Err(GoalError::malformed(
            line_no,
            format!("expected score line, found tag '{tag}'"),
        ));
    }
    parse_int(line_no, "score", value)
}

/// Decode one goal line, dispatching on its type tag.
pub fn decode_goal(line_no: usize, line: &str) -> Result<DecodedLine, GoalError> {
    let (tag, body) = line
        .split_once(':')
        .ok_or_else(|| GoalError::malformed(line_no, "missing ':' after type tag"))?;
    let fields: Vec<&str> = body.split(',').collect();

    let expected = match tag {
        SIMPLE_TAG => 4,
        ETERNAL_TAG | NEGATIVE_TAG => 3,
        CHECKLIST_TAG => 6,
        other => {
            return Ok(DecodedLine::Unknown {
                tag: other.to_string(),
            })
        }
    };
    if fields.len() != expected {
        return Err(GoalError::malformed(
            line_no,
            format!("{tag} expects {expected} fields, found {}", fields.len()),
        ));
    }

    let kind = match tag {
        SIMPLE_TAG => GoalKind::Simple {
            is_complete: parse_bool(line_no, "isComplete", fields[3])?,
        },
        CHECKLIST_TAG => GoalKind::Checklist {
            target_count: parse_count(line_no, "targetCount", fields[3])?,
            bonus_points: parse_int(line_no, "bonusPoints", fields[4])?,
            current_count: parse_count(line_no, "currentCount", fields[5])?,
        },
        NEGATIVE_TAG => GoalKind::Negative,
        _ => GoalKind::Eternal,
    };

    let points = parse_int(line_no, "points", fields[2])?;
    let goal = Goal::from_parts(fields[0].to_string(), fields[1].to_string(), points, kind)
        .map_err(|e| GoalError::malformed(line_no, e.to_string()))?;
    Ok(DecodedLine::Goal(goal))
}

fn parse_int(line_no: usize, field: &str, value: &str) -> Result<i64, GoalError> {
    value
        .trim()
        .parse()
        .map_err(|_| GoalError::malformed(line_no, format!("{field} is not an integer: '{value}'")))
}

fn parse_count(line_no: usize, field: &str, value: &str) -> Result<u32, GoalError> {
    value.trim().parse().map_err(|_| {
        GoalError::malformed(
            line_no,
            format!("{field} is not a non-negative integer: '{value}'"),
        )
    })
}

// Older saves wrote `True`/`False`, so the literal is matched case-insensitively.
fn parse_bool(line_no: usize, field: &str, value: &str) -> Result<bool, GoalError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(GoalError::malformed(
            line_no,
            format!("{field} must be true or false, found '{value}'"),
        ))
    }
}
