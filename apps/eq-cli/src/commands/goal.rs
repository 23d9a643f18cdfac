// goal.rs — One-shot goal subcommands: add, list, record, score, init.
//
// Each invocation loads the save file (if any), runs one command through
// the session, prints the outcome, and saves when the command changed state.

use std::io::Write;

use clap::Subcommand;
use eq_goal::{Command, GoalSpec, QuestConfig, QuestSettings};

use super::{open_session, print_outcome, save_session};

#[derive(Subcommand)]
pub enum AddCommands {
    /// A goal completed by a single event.
    Simple {
        name: String,
        description: String,
        /// Points awarded on completion.
        #[arg(allow_negative_numbers = true)]
        points: i64,
    },
    /// A goal that is never finished and pays every time.
    Eternal {
        name: String,
        description: String,
        /// Points awarded per event.
        #[arg(allow_negative_numbers = true)]
        points: i64,
    },
    /// A goal completed after a number of events, with a bonus at the end.
    Checklist {
        name: String,
        description: String,
        /// Points awarded per event.
        #[arg(allow_negative_numbers = true)]
        points: i64,
        /// Number of events needed to complete the goal.
        target: u32,
        /// Extra points on the event that reaches the target.
        #[arg(allow_negative_numbers = true)]
        bonus: i64,
    },
    /// A habit to break; each event costs points.
    Negative {
        name: String,
        description: String,
        /// Points lost per event.
        #[arg(allow_negative_numbers = true)]
        points: i64,
    },
}

impl From<AddCommands> for GoalSpec {
    fn from(cmd: AddCommands) -> Self {
        match cmd {
            AddCommands::Simple {
                name,
                description,
                points,
            } => GoalSpec::Simple {
                name,
                description,
                points,
            },
            AddCommands::Eternal {
                name,
                description,
                points,
            } => GoalSpec::Eternal {
                name,
                description,
                points,
            },
            AddCommands::Checklist {
                name,
                description,
                points,
                target,
                bonus,
            } => GoalSpec::Checklist {
                name,
                description,
                points,
                target_count: target,
                bonus_points: bonus,
            },
            AddCommands::Negative {
                name,
                description,
                points,
            } => GoalSpec::Negative {
                name,
                description,
                points,
            },
        }
    }
}

pub fn add(
    config: &QuestConfig,
    settings: &QuestSettings,
    goal: AddCommands,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    run_one(config, settings, Command::AddGoal(goal.into()), out)
}

pub fn list(
    config: &QuestConfig,
    settings: &QuestSettings,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    run_one(config, settings, Command::ListGoals, out)
}

pub fn record(
    config: &QuestConfig,
    settings: &QuestSettings,
    ordinal: usize,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    run_one(config, settings, Command::RecordEvent { ordinal }, out)
}

pub fn score(
    config: &QuestConfig,
    settings: &QuestSettings,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    run_one(config, settings, Command::ShowScore, out)
}

/// Write a new save file holding the sample goals. Refuses to overwrite.
pub fn init(config: &QuestConfig, out: &mut impl Write) -> anyhow::Result<()> {
    if config.save_file.exists() {
        anyhow::bail!(
            "save file already exists at {}; remove it or pass --file to start elsewhere",
            config.save_file.display()
        );
    }

    // Events are not logged for seeding; the history starts with real activity.
    let mut session = eq_goal::Session::new(eq_goal::GoalManager::new());
    for spec in sample_goals() {
        session.execute(Command::AddGoal(spec))?;
    }
    let outcome = save_session(&mut session, config)?;
    print_outcome(out, &outcome)?;
    Ok(())
}

fn run_one(
    config: &QuestConfig,
    settings: &QuestSettings,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut session = open_session(config, settings)?;
    let mutates = command.mutates();
    let outcome = session.execute(command)?;
    print_outcome(out, &outcome)?;
    if mutates {
        save_session(&mut session, config)?;
    }
    Ok(())
}

fn sample_goals() -> Vec<GoalSpec> {
    vec![
        GoalSpec::Simple {
            name: "Run Marathon".to_string(),
            description: "Complete a marathon race".to_string(),
            points: 1000,
        },
        GoalSpec::Eternal {
            name: "Read Scriptures".to_string(),
            description: "Daily scripture study".to_string(),
            points: 100,
        },
        GoalSpec::Checklist {
            name: "Attend Temple".to_string(),
            description: "Visit the temple".to_string(),
            points: 50,
            target_count: 10,
            bonus_points: 500,
        },
        GoalSpec::Checklist {
            name: "Hydrate Daily".to_string(),
            description: "Drink 8 glasses of water".to_string(),
            points: 5,
            target_count: 7,
            bonus_points: 70,
        },
        GoalSpec::Negative {
            name: "Quit Video Games".to_string(),
            description: "Avoid playing video games".to_string(),
            points: 50,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn add_record_score_persist_between_invocations() {
        let project = TempDir::new().unwrap();
        let config = QuestConfig::for_root(project.path());
        let settings = QuestSettings::default();

        let mut out = Vec::new();
        add(
            &config,
            &settings,
            AddCommands::Checklist {
                name: "Temple".to_string(),
                description: "Visit".to_string(),
                points: 50,
                target: 2,
                bonus: 500,
            },
            &mut out,
        )
        .unwrap();
        assert!(config.save_file.exists());

        record(&config, &settings, 1, &mut out).unwrap();
        record(&config, &settings, 1, &mut out).unwrap();

        let mut out = Vec::new();
        score(&config, &settings, &mut out).unwrap();
        assert_eq!(
            output(out),
            "Current Score: 600\nLevel: 0 (600/1000 to next level)\n"
        );

        let mut out = Vec::new();
        list(&config, &settings, &mut out).unwrap();
        assert_eq!(
            output(out),
            "Your Goals:\n1. [X] Temple (Visit) -- Completed 2/2 times\n"
        );
    }

    #[test]
    fn record_invalid_ordinal_fails_without_saving() {
        let project = TempDir::new().unwrap();
        let config = QuestConfig::for_root(project.path());
        let settings = QuestSettings::default();

        let err = record(&config, &settings, 1, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("no goal #1"));
        assert!(!config.save_file.exists());
    }

    #[test]
    fn list_does_not_write_save_file() {
        let project = TempDir::new().unwrap();
        let config = QuestConfig::for_root(project.path());

        let mut out = Vec::new();
        list(&config, &QuestSettings::default(), &mut out).unwrap();
        assert_eq!(output(out), "No goals yet.\n");
        assert!(!config.save_file.exists());
    }

    #[test]
    fn init_seeds_sample_goals_once() {
        let project = TempDir::new().unwrap();
        let config = QuestConfig::for_root(project.path());

        let mut out = Vec::new();
        init(&config, &mut out).unwrap();
        assert!(output(out).starts_with("Saved 5 goal(s)"));

        let text = std::fs::read_to_string(&config.save_file).unwrap();
        assert!(text.starts_with("Score:0\nSimpleGoal:Run Marathon,"));
        assert_eq!(text.lines().count(), 6);

        assert!(init(&config, &mut Vec::new()).is_err());
    }
}
