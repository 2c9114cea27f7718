//! Front-end independent handling of user actions.
//!
//! A front end turns user input into an [`Action`], hands it to [`handle`]
//! together with the session, and draws the returned [`DisplayState`]. The
//! controller owns no state of its own.

use crate::config::Currency;
use crate::error::{Result, TowerError};
use crate::models::ColorFilter;
use crate::CommandTower;

// ---------------------------------------------------------------------------
// Action / Command
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Forward button: next visit, or a new commander at the frontier.
    Next { filter: ColorFilter, query: String },
    /// Back button.
    Back,
    /// Redraw the current visit.
    Current,
    /// Show (and cache) the current decklist.
    Decklist,
    /// Show (and cache) the current deck price.
    Price,
}

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Help,
    Quit,
}

/// Parse a terminal command.
///
/// `n [colors...] [-- query...]` moves forward, where colors are tokens such
/// as `w`, `blue` or `e` (exact) and everything after `--` is free text
/// passed to the catalog search. Blank input redraws the current visit.
pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let verb = match words.next() {
        Some(v) => v.to_ascii_lowercase(),
        None => return Ok(Command::Act(Action::Current)),
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.as_str() {
        "n" | "next" => {
            let (tokens, query) = match rest.iter().position(|w| *w == "--") {
                Some(idx) => (&rest[..idx], rest[idx + 1..].join(" ")),
                None => (&rest[..], String::new()),
            };
            Command::Act(Action::Next {
                filter: ColorFilter::from_tokens(tokens)?,
                query,
            })
        }
        "b" | "back" => Command::Act(Action::Back),
        "c" | "current" => Command::Act(Action::Current),
        "d" | "deck" | "decklist" => Command::Act(Action::Decklist),
        "p" | "price" => Command::Act(Action::Price),
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => {
            return Err(TowerError::InvalidArgument(format!(
                "Unknown command: {}",
                other
            )))
        }
    };
    Ok(command)
}

pub const HELP: &str = "\
commands:
  n [colors...] [-- query]   next commander (colors: w u b r g, e = exact)
  b                          previous commander
  c                          show current commander
  d                          show decklist
  p                          show deck price
  h                          help
  q                          quit";

// ---------------------------------------------------------------------------
// DisplayState
// ---------------------------------------------------------------------------

/// Everything a front end needs to draw after an action.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    /// Commander name; empty for a placeholder visit.
    pub name: String,
    pub image_source: String,
    pub placeholder: bool,
    /// Zero-based index of the current visit.
    pub position: Option<usize>,
    pub len: usize,
    pub can_step_back: bool,
    /// False when the action was a navigation no-op (e.g. back on the oldest visit).
    pub moved: bool,
    pub decklist: Option<String>,
    pub price: Option<f64>,
}

/// Apply `action` to the session and describe the result.
pub fn handle(tower: &mut CommandTower, action: Action) -> DisplayState {
    let moved = match action {
        Action::Next { filter, query } => {
            tower.advance(&filter, &query);
            true
        }
        Action::Back => tower.step_back().is_some(),
        Action::Current => false,
        Action::Decklist => {
            tower.decklist();
            false
        }
        Action::Price => {
            tower.price();
            false
        }
    };
    snapshot(tower, moved)
}

fn snapshot(tower: &CommandTower, moved: bool) -> DisplayState {
    let history = tower.history();
    let visit = history.current();
    DisplayState {
        name: visit.map(|v| v.name().to_string()).unwrap_or_default(),
        image_source: visit
            .map(|v| v.image().source().to_string())
            .unwrap_or_default(),
        placeholder: visit.is_some_and(|v| v.is_placeholder()),
        position: history.cursor(),
        len: history.len(),
        can_step_back: history.can_step_back(),
        moved,
        decklist: visit.and_then(|v| v.decklist()).map(str::to_string),
        price: visit.and_then(|v| v.price()),
    }
}

/// Plain-text rendering used by the terminal front end.
pub fn render(state: &DisplayState, currency: Currency) -> String {
    let mut out = String::new();
    let Some(position) = state.position else {
        out.push_str("no commander yet, use `n` to fetch one");
        return out;
    };

    let name = if state.placeholder {
        "(no commander found)"
    } else {
        state.name.as_str()
    };
    out.push_str(&format!("[{}/{}] {}\n", position + 1, state.len, name));
    out.push_str(&format!("image: {}", state.image_source));
    if state.placeholder {
        out.push_str(" (placeholder)");
    }
    if let Some(decklist) = &state.decklist {
        out.push_str(&format!("\n\n{}\n", decklist));
    }
    if let Some(price) = state.price {
        out.push_str(&format!("\nprice: {:.2} {}", price, currency));
    }
    out
}
