// Line-oriented operator session: parse one command per line, apply it to the
// draft controller, render the result as text.

use std::fmt::Write as _;
use std::path::Path;

use allyselect_core::{CaptainMode, DraftController, DraftError, PickSlot, Team, TeamId};
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{self, CatalogError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Parse(String),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// One operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Json,
    Summary,
    Pick {
        alliance: usize,
        slot: PickSlot,
        team: Option<TeamId>,
    },
    Captain {
        alliance: usize,
        team: Option<TeamId>,
    },
    Available {
        alliance: usize,
        slot: PickSlot,
    },
    Candidates {
        alliance: usize,
    },
    Reset,
    Reload {
        path: String,
    },
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
commands:
  show                          alliance table
  json                          alliance table and summary as JSON
  summary                       selector counters
  pick <alliance> <1|2> <team|->  fill or clear a pick slot
  captain <alliance> <team|->   pin or unpin a captain
  available <alliance> [round]  draftable teams for an alliance
  candidates <alliance>         teams eligible as captain
  reset                         clear every pick
  reload <path>                 replace the team catalog
  help                          this text
  quit                          exit";

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = (words[0].to_ascii_lowercase(), &words[1..]);

        let cmd = match (name.as_str(), args) {
            ("show", []) => Command::Show,
            ("json", []) => Command::Json,
            ("summary", []) => Command::Summary,
            ("pick", [alliance, round, team]) => Command::Pick {
                alliance: parse_alliance(alliance)?,
                slot: parse_round(round)?,
                team: parse_team_or_clear(team)?,
            },
            ("captain", [alliance, team]) => Command::Captain {
                alliance: parse_alliance(alliance)?,
                team: parse_team_or_clear(team)?,
            },
            ("available", [alliance]) => Command::Available {
                alliance: parse_alliance(alliance)?,
                slot: PickSlot::First,
            },
            ("available", [alliance, round]) => Command::Available {
                alliance: parse_alliance(alliance)?,
                slot: parse_round(round)?,
            },
            ("candidates", [alliance]) => Command::Candidates {
                alliance: parse_alliance(alliance)?,
            },
            ("reset", []) => Command::Reset,
            ("reload", [path]) => Command::Reload {
                path: (*path).to_string(),
            },
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            (
                "show" | "json" | "summary" | "pick" | "captain" | "available" | "candidates"
                | "reset" | "reload" | "help" | "quit" | "exit",
                _,
            ) => {
                return Err(CommandError::Parse(format!(
                    "wrong number of arguments for `{name}` (try `help`)"
                )));
            }
            _ => {
                return Err(CommandError::Parse(format!(
                    "unknown command `{name}` (try `help`)"
                )));
            }
        };
        Ok(Some(cmd))
    }
}

fn parse_alliance(raw: &str) -> Result<usize, CommandError> {
    raw.parse::<usize>()
        .map_err(|_| CommandError::Parse(format!("invalid alliance number `{raw}`")))
}

fn parse_round(raw: &str) -> Result<PickSlot, CommandError> {
    raw.parse::<usize>()
        .ok()
        .and_then(PickSlot::from_round)
        .ok_or_else(|| CommandError::Parse(format!("invalid round `{raw}` (expected 1 or 2)")))
}

fn parse_team_or_clear(raw: &str) -> Result<Option<TeamId>, CommandError> {
    if raw == "-" {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(|n| Some(TeamId(n)))
        .map_err(|_| CommandError::Parse(format!("invalid team number `{raw}`")))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Text(String),
    Quit,
}

pub struct Session {
    controller: DraftController,
}

impl Session {
    pub fn new(controller: DraftController) -> Self {
        Session { controller }
    }

    pub fn controller(&self) -> &DraftController {
        &self.controller
    }

    /// Parse and execute one line. Blank lines produce empty text.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, CommandError> {
        match Command::parse(line)? {
            Some(cmd) => self.execute(cmd),
            None => Ok(Outcome::Text(String::new())),
        }
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Outcome, CommandError> {
        let text = match cmd {
            Command::Show => render_table(&self.controller),
            Command::Json => {
                let doc = serde_json::json!({
                    "alliances": self.controller.alliance_table(),
                    "summary": self.controller.selector_summary(),
                });
                serde_json::to_string_pretty(&doc)?
            }
            Command::Summary => render_summary(&self.controller),
            Command::Pick {
                alliance,
                slot,
                team,
            } => {
                self.controller.set_pick(alliance, slot, team)?;
                render_table(&self.controller)
            }
            Command::Captain { alliance, team } => {
                self.controller.set_captain(alliance, team)?;
                render_table(&self.controller)
            }
            Command::Available { alliance, slot } => {
                let teams = self.controller.available_teams(alliance, slot)?;
                render_team_list(
                    &format!("available for alliance {alliance}, {slot}"),
                    &teams,
                )
            }
            Command::Candidates { alliance } => {
                let teams = self.controller.captain_candidates(alliance)?;
                render_team_list(&format!("captain candidates for alliance {alliance}"), &teams)
            }
            Command::Reset => {
                self.controller.reset_picks();
                render_table(&self.controller)
            }
            Command::Reload { path } => {
                let records = catalog::load_catalog(Path::new(&path))?;
                let count = records.len();
                self.controller.update_teams(records)?;
                info!("Reloaded {} teams from {}", count, path);
                format!(
                    "loaded {count} teams from {path}\n{}",
                    render_table(&self.controller)
                )
            }
            Command::Help => HELP_TEXT.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Text(text))
    }

    /// Execute every line of `input`, collecting rendered output. Failed
    /// commands are reported inline and do not stop the run.
    pub fn run_script(&mut self, input: &str) -> String {
        let mut out = String::new();
        for line in input.lines() {
            match self.execute_line(line) {
                Ok(Outcome::Text(text)) => {
                    if !text.is_empty() {
                        out.push_str(&text);
                        out.push('\n');
                    }
                }
                Ok(Outcome::Quit) => break,
                Err(e) => {
                    warn!("Command `{}` failed: {}", line.trim(), e);
                    let _ = writeln!(out, "error: {e}");
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn cell(team: Option<TeamId>) -> String {
    team.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn render_table(controller: &DraftController) -> String {
    let rows = controller.alliance_table();
    let slots = controller.rules().slots();
    let mut out = String::new();

    let _ = write!(out, "{:<9}{:<10}", "alliance", "captain");
    for slot in slots {
        let _ = write!(out, "{:<10}", format!("pick {}", slot.round()));
    }
    for slot in slots {
        let _ = write!(out, "{:<10}", format!("rec {}", slot.round()));
    }
    let _ = writeln!(out, "score");

    for row in &rows {
        let captain = match row.captain_mode {
            CaptainMode::Manual => format!("{}*", cell(row.captain)),
            CaptainMode::Auto => cell(row.captain),
        };
        let _ = write!(out, "{:<9}{:<10}", row.alliance_number, captain);
        for pick in &row.picks {
            let _ = write!(out, "{:<10}", cell(*pick));
        }
        for rec in &row.recommendations {
            let _ = write!(out, "{:<10}", cell(*rec));
        }
        let _ = writeln!(out, "{:.1}", row.alliance_score);
    }
    if rows.is_empty() {
        let _ = writeln!(out, "(no alliances: not enough teams)");
    }
    out.trim_end().to_string()
}

pub fn render_summary(controller: &DraftController) -> String {
    let s = controller.selector_summary();
    format!(
        "teams: {}\nalliances: {}\ncaptains assigned: {}\npicks made: {}\navailable for picks: {}\ncan make picks: {}",
        s.total_teams,
        s.total_alliances,
        s.captains_assigned,
        s.selected_picks,
        s.available_for_picks,
        if s.can_make_picks { "yes" } else { "no" },
    )
}

fn render_team_list(title: &str, teams: &[&Team]) -> String {
    let mut out = format!("{title}:");
    if teams.is_empty() {
        out.push_str("\n  (none)");
    }
    for team in teams {
        let _ = write!(
            out,
            "\n  {:>6}  rank {:>3}  {:>8.1}  {}",
            team.id, team.rank, team.score, team.name
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
