// commands — Subcommand implementations and shared session plumbing.

pub mod goal;
pub mod shell;

use std::fs;
use std::io::Write;

use eq_goal::{Command, Outcome, QuestConfig, QuestSettings, Session};

/// Build a session from settings and load the save file if one exists.
pub fn open_session(config: &QuestConfig, settings: &QuestSettings) -> anyhow::Result<Session> {
    let mut session = Session::from_config(config, settings);
    if config.save_file.exists() {
        let outcome = session.execute(Command::Load {
            path: config.save_file.clone(),
        })?;
        if let Outcome::Loaded { report, .. } = outcome {
            if !report.skipped.is_empty() {
                tracing::warn!(
                    skipped = report.skipped.len(),
                    "save file contains goal types this version does not know"
                );
            }
        }
    }
    Ok(session)
}

/// Save the session to the configured save file, creating its directory.
pub fn save_session(session: &mut Session, config: &QuestConfig) -> anyhow::Result<Outcome> {
    if let Some(parent) = config.save_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let outcome = session.execute(Command::Save {
        path: config.save_file.clone(),
    })?;
    Ok(outcome)
}

/// Render an outcome for a human.
pub fn print_outcome(out: &mut impl Write, outcome: &Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::GoalAdded { ordinal } => writeln!(out, "Goal #{} added.", ordinal)?,
        Outcome::Goals(goals) => {
            if goals.is_empty() {
                writeln!(out, "No goals yet.")?;
            } else {
                writeln!(out, "Your Goals:")?;
                for (ordinal, line) in goals {
                    writeln!(out, "{}. {}", ordinal, line)?;
                }
            }
        }
        Outcome::EventRecorded {
            name,
            points,
            score,
            completed,
            ..
        } => {
            writeln!(out, "Recorded '{}': {:+} points (score {}).", name, points, score)?;
            if *completed {
                writeln!(out, "Goal complete!")?;
            }
        }
        Outcome::Score(card) => {
            writeln!(out, "Current Score: {}", card.score)?;
            writeln!(
                out,
                "Level: {} ({}/1000 to next level)",
                card.level, card.progress
            )?;
        }
        Outcome::Saved { path, goals } => {
            writeln!(out, "Saved {} goal(s) to {}.", goals, path.display())?
        }
        Outcome::Loaded { path, report } => {
            writeln!(out, "Loaded {} goal(s) from {}.", report.goals, path.display())?;
            if !report.skipped.is_empty() {
                let lines: Vec<String> = report
                    .skipped
                    .iter()
                    .map(|s| format!("line {} ({})", s.line, s.tag))
                    .collect();
                writeln!(
                    out,
                    "Warning: skipped {} line(s) with unknown goal types: {}",
                    report.skipped.len(),
                    lines.join(", ")
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_goal::{LoadReport, ScoreCard, SkippedLine};
    use std::path::PathBuf;

    fn render(outcome: &Outcome) -> String {
        let mut out = Vec::new();
        print_outcome(&mut out, outcome).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_score_card() {
        let text = render(&Outcome::Score(ScoreCard {
            score: -5,
            level: -1,
            progress: 995,
        }));
        assert_eq!(
            text,
            "Current Score: -5\nLevel: -1 (995/1000 to next level)\n"
        );
    }

    #[test]
    fn renders_signed_points() {
        let text = render(&Outcome::EventRecorded {
            ordinal: 2,
            name: "Games".to_string(),
            points: -50,
            score: 950,
            completed: false,
        });
        assert_eq!(text, "Recorded 'Games': -50 points (score 950).\n");
    }

    #[test]
    fn renders_skipped_line_warning() {
        let text = render(&Outcome::Loaded {
            path: PathBuf::from("goals.txt"),
            report: LoadReport {
                goals: 1,
                skipped: vec![SkippedLine {
                    line: 3,
                    tag: "StretchGoal".to_string(),
                }],
            },
        });
        assert!(text.contains("Loaded 1 goal(s) from goals.txt."));
        assert!(text.contains("skipped 1 line(s) with unknown goal types: line 3 (StretchGoal)"));
    }

    #[test]
    fn renders_empty_listing() {
        assert_eq!(render(&Outcome::Goals(Vec::new())), "No goals yet.\n");
    }
}
