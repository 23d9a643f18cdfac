// shell.rs — The numbered interactive menu.
//
// Each menu choice turns into one `Command` for the session. Input and
// output are generic so the whole menu can be driven from a test with a
// byte buffer. End of input behaves like choosing Exit.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use eq_goal::{Command, GoalSpec, QuestConfig, QuestSettings, Session};

use super::{open_session, print_outcome};

const MENU: &str = "\
Eternal Quest
  1. Create New Goal
  2. List Goals
  3. Save Goals
  4. Load Goals
  5. Record Event
  6. View Score
  7. Exit";

const GOAL_TYPES: &str = "\
Goal types:
  1. Simple Goal
  2. Eternal Goal
  3. Checklist Goal
  4. Negative Goal";

/// Run the menu until the user exits or input ends.
pub fn run(
    config: &QuestConfig,
    settings: &QuestSettings,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut session = open_session(config, settings)?;
    let mut shell = Shell {
        session: &mut session,
        config,
        input,
        out,
    };
    shell.run()
}

struct Shell<'a, R, W> {
    session: &'a mut Session,
    config: &'a QuestConfig,
    input: &'a mut R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Shell<'_, R, W> {
    fn run(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.out, "\n{}", MENU)?;
            let Some(choice) = self.prompt("Select an option: ")? else {
                return Ok(());
            };

            let command = match choice.as_str() {
                "1" => self.read_goal_spec()?.map(Command::AddGoal),
                "2" => Some(Command::ListGoals),
                "3" => match self.read_path("save to")? {
                    Some(path) => {
                        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                            std::fs::create_dir_all(parent)?;
                        }
                        Some(Command::Save { path })
                    }
                    None => None,
                },
                "4" => self.read_path("load from")?.map(|path| Command::Load { path }),
                "5" => self.read_ordinal()?,
                "6" => Some(Command::ShowScore),
                "7" => return Ok(()),
                _ => {
                    writeln!(self.out, "Invalid option.")?;
                    None
                }
            };

            if let Some(command) = command {
                match self.session.execute(command) {
                    Ok(outcome) => print_outcome(&mut *self.out, &outcome)?,
                    Err(e) => {
                        tracing::debug!(error = %e, "menu command failed");
                        writeln!(self.out, "Error: {}", e)?;
                    }
                }
            }
        }
    }

    /// Print `message` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for a number; prints a notice and yields `None` when it doesn't parse.
    fn prompt_number<T: std::str::FromStr>(&mut self, message: &str) -> anyhow::Result<Option<T>> {
        let Some(text) = self.prompt(message)? else {
            return Ok(None);
        };
        match text.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.out, "'{}' is not a valid number.", text)?;
                Ok(None)
            }
        }
    }

    fn read_goal_spec(&mut self) -> anyhow::Result<Option<GoalSpec>> {
        writeln!(self.out, "{}", GOAL_TYPES)?;
        let Some(kind) = self.prompt("Enter choice: ")? else {
            return Ok(None);
        };
        if !matches!(kind.as_str(), "1" | "2" | "3" | "4") {
            writeln!(self.out, "Invalid type.")?;
            return Ok(None);
        }

        let Some(name) = self.prompt("Enter goal name: ")? else {
            return Ok(None);
        };
        let Some(description) = self.prompt("Enter description: ")? else {
            return Ok(None);
        };
        let Some(points) = self.prompt_number::<i64>("Enter points: ")? else {
            return Ok(None);
        };

        let spec = match kind.as_str() {
            "1" => GoalSpec::Simple {
                name,
                description,
                points,
            },
            "2" => GoalSpec::Eternal {
                name,
                description,
                points,
            },
            "3" => {
                let Some(target_count) = self.prompt_number::<u32>("Enter target count: ")? else {
                    return Ok(None);
                };
                let Some(bonus_points) = self.prompt_number::<i64>("Enter bonus points: ")? else {
                    return Ok(None);
                };
                GoalSpec::Checklist {
                    name,
                    description,
                    points,
                    target_count,
                    bonus_points,
                }
            }
            _ => GoalSpec::Negative {
                name,
                description,
                points,
            },
        };
        Ok(Some(spec))
    }

    /// Ask for a file name; blank means the configured save file.
    fn read_path(&mut self, verb: &str) -> anyhow::Result<Option<PathBuf>> {
        let message = format!(
            "Enter filename to {} [{}]: ",
            verb,
            self.config.save_file.display()
        );
        let Some(text) = self.prompt(&message)? else {
            return Ok(None);
        };
        if text.is_empty() {
            Ok(Some(self.config.save_file.clone()))
        } else {
            Ok(Some(PathBuf::from(text)))
        }
    }

    fn read_ordinal(&mut self) -> anyhow::Result<Option<Command>> {
        let goals: Vec<(usize, String)> = self.session.manager().display_goals().collect();
        if goals.is_empty() {
            writeln!(self.out, "No goals yet.")?;
            return Ok(None);
        }
        for (ordinal, line) in &goals {
            writeln!(self.out, "{}. {}", ordinal, line)?;
        }
        Ok(self
            .prompt_number::<usize>("Enter goal number to record: ")?
            .map(|ordinal| Command::RecordEvent { ordinal }))
    }
}
