//! Interactive driving loop.
//!
//! Shows the menu for the current phase (or panel sub-mode), reads one
//! choice, hands it to the [`SessionController`], and reports the outcome.

use std::path::PathBuf;

use clocktower_core::{Menu, Outcome, SessionController};
use clocktower_panel::MemoryLink;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use rustyline::Result as RlResult;
use tracing::debug;

const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

/// Render a menu the way the operator sees it.
pub fn render_menu(menu: &Menu) -> String {
    let mut out = String::new();
    match menu {
        Menu::Phase { phase, entries } => {
            out.push_str(&format!("\n[{}]\nAvailable Actions:\n", phase));
            for entry in entries {
                out.push_str(&format!("{}: {}\n", entry.input, entry.label));
            }
        }
        Menu::Panel { mode, options } => {
            out.push_str(&format!("\n{}:\n", mode.title()));
            for option in options.iter() {
                out.push_str(&format!("{}: {}\n", option.input, option.label));
            }
        }
    }
    out
}

/// One-line report of an outcome, or `None` when the caller must prompt.
pub fn describe(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Transitioned(phase) => Some(format!("Entered {}.", phase)),
        Outcome::ActionDone(action) => Some(format!("Done: {}.", action.label())),
        Outcome::PanelStep(mode) if mode.is_idle() => Some("Panel back to idle.".to_string()),
        Outcome::PanelStep(_) => None,
        Outcome::NeedsPlayer(_) => None,
        Outcome::Invalid(reason) => Some(format!("Invalid input. Please try again. ({})", reason)),
        Outcome::Failed(e) => Some(format!("Error: {}", e)),
    }
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Creates a new REPL, loading history if there is any.
    pub fn new(history_path: Option<PathBuf>) -> RlResult<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history_path {
            if path.exists() {
                let _ = editor.load_history(path);
            }
        }
        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Ask the operator which serial port the panel is on. An empty answer
    /// means no panel.
    pub fn choose_port(&mut self, ports: &[String]) -> RlResult<Option<String>> {
        if ports.is_empty() {
            println!("No serial ports found; running without the panel.");
            return Ok(None);
        }

        println!("Available serial ports:");
        for (i, port) in ports.iter().enumerate() {
            println!("{}: {}", i + 1, port);
        }

        loop {
            let line = match self.editor.readline("Panel port (number or path, empty for none): ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
                Err(e) => return Err(e),
            };
            match pick_port(ports, &line) {
                PortPick::Chosen(port) => return Ok(Some(port)),
                PortPick::Skip => return Ok(None),
                PortPick::Invalid => println!("Invalid input. Please try again."),
            }
        }
    }

    /// Runs the loop until the operator quits.
    pub fn run(
        &mut self,
        controller: &mut SessionController,
        dry_run: Option<&MemoryLink>,
    ) -> RlResult<()> {
        println!("Clocktower v{}", env!("CARGO_PKG_VERSION"));
        println!("Choose an option by number or name; 'quit' to exit.");
        if dry_run.is_some() {
            println!("Dry run: panel commands are printed, not sent.");
        }

        loop {
            self.show_panel_output(controller, dry_run);
            print!("{}", render_menu(&controller.menu()));

            let line = match self.editor.readline("Next action: ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            self.editor.add_history_entry(input)?;
            if QUIT_WORDS.contains(&input.to_lowercase().as_str()) {
                break;
            }

            debug!(input, "operator input");
            let mut outcome = controller.submit(input);
            while let Outcome::NeedsPlayer(pending) = outcome {
                let id = match self.editor.readline("Player ID: ") {
                    Ok(id) => id,
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                        println!("Cancelled.");
                        break;
                    }
                    Err(e) => return Err(e),
                };
                outcome = controller.submit_player(pending, &id);
            }

            if let Some(message) = describe(&outcome) {
                println!("{}", message);
            }
        }

        controller.shutdown();
        self.show_panel_output(controller, dry_run);

        if let Some(path) = &self.history_path {
            let _ = self.editor.save_history(path);
        }

        println!("Goodbye!");
        Ok(())
    }

    fn show_panel_output(&self, controller: &mut SessionController, dry_run: Option<&MemoryLink>) {
        if let Some(link) = dry_run {
            for line in link.take_written() {
                println!("[WIRE] {}", line);
            }
        }
        for line in controller.panel_output() {
            println!("[PANEL] {}", line);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PortPick {
    Chosen(String),
    Skip,
    Invalid,
}

fn pick_port(ports: &[String], input: &str) -> PortPick {
    let input = input.trim();
    if input.is_empty() {
        return PortPick::Skip;
    }
    if let Ok(n) = input.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| ports.get(i)) {
            Some(port) => PortPick::Chosen(port.clone()),
            None => PortPick::Invalid,
        };
    }
    PortPick::Chosen(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clocktower_core::{GameSession, MachineOptions, SessionError, Stage, StageAction};
    use clocktower_models::GamePhase;
    use clocktower_panel::PanelMode;

    #[test]
    fn test_render_phase_menu() {
        let controller =
            SessionController::new(GameSession::new(MachineOptions::full(), Stage::bare()));
        let text = render_menu(&controller.menu());
        assert!(text.contains("[Game Configuration]"));
        assert!(text.contains("1: Finish Configuration\n"));
        assert!(text.contains("4: Set Sects and Violets\n"));
        // No panel, so no panel configuration entry
        assert!(!text.contains("Configure Panel"));
    }

    #[test]
    fn test_render_panel_menu() {
        let menu = Menu::Panel {
            mode: PanelMode::NominationVoting,
            options: PanelMode::NominationVoting.menu(),
        };
        let text = render_menu(&menu);
        assert!(text.contains("Nominations Options:"));
        assert!(text.contains("4: End Nominations\n"));
    }

    #[test]
    fn test_describe_outcomes() {
        assert_eq!(
            describe(&Outcome::Transitioned(GamePhase::Night)).unwrap(),
            "Entered Night Phase."
        );
        assert_eq!(
            describe(&Outcome::ActionDone(StageAction::GoodWins)).unwrap(),
            "Done: Good Wins."
        );
        assert!(describe(&Outcome::PanelStep(PanelMode::Kill)).is_none());
        assert!(describe(&Outcome::Failed(SessionError::NoPanel))
            .unwrap()
            .starts_with("Error:"));
    }

    #[test]
    fn test_pick_port() {
        let ports = vec!["/dev/ttyACM0".to_string(), "/dev/ttyUSB0".to_string()];
        assert_eq!(pick_port(&ports, "2"), PortPick::Chosen("/dev/ttyUSB0".into()));
        assert_eq!(pick_port(&ports, " "), PortPick::Skip);
        assert_eq!(pick_port(&ports, "0"), PortPick::Invalid);
        assert_eq!(pick_port(&ports, "3"), PortPick::Invalid);
        assert_eq!(
            pick_port(&ports, "/dev/ttyS3"),
            PortPick::Chosen("/dev/ttyS3".into())
        );
    }
}
