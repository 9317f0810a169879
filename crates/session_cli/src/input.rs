//! Parsing of typed player input

use anyhow::{bail, Context, Result};
use session_core::{Promotion, TimeMode};

/// One line of player input
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Move {
        from: String,
        to: String,
        promotion: Option<Promotion>,
    },
    NewGame,
    Surrender,
    Mode(TimeMode),
    /// Zero-based ledger index
    View(usize),
    Live,
    Moves,
    Board,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  e2e4 | e2 e4 | e7e8q   move a White piece (promotion letter optional)
  new                    start a new game
  surrender              resign the current game
  mode <m>               unlimited | blitz | rapid | classical (before the first move)
  view <n>               show the position after move n (1-based)
  live                   return to the live position
  moves                  print the move list
  board                  print the board
  help                   this text
  quit                   exit";

pub fn parse(line: &str) -> Result<Input> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, rest)) = words.split_first() else {
        bail!("empty input");
    };

    let input = match (head.to_ascii_lowercase().as_str(), rest) {
        ("new", []) => Input::NewGame,
        ("surrender" | "resign", []) => Input::Surrender,
        ("mode", [mode]) => Input::Mode(mode.parse().map_err(anyhow::Error::msg)?),
        ("view", [n]) => {
            let n: usize = n.parse().with_context(|| format!("not a move number: {n}"))?;
            if n == 0 {
                bail!("move numbers start at 1");
            }
            Input::View(n - 1)
        }
        ("live", []) => Input::Live,
        ("moves", []) => Input::Moves,
        ("board", []) => Input::Board,
        ("help" | "?", []) => Input::Help,
        ("quit" | "exit", []) => Input::Quit,
        _ => parse_move(&words.concat())?,
    };
    Ok(input)
}

fn parse_move(text: &str) -> Result<Input> {
    let text = text.to_ascii_lowercase();
    if !(4..=5).contains(&text.len()) || !text.is_ascii() {
        bail!("unrecognised input: {text} (type `help`)");
    }
    let (from, rest) = text.split_at(2);
    let (to, suffix) = rest.split_at(2);
    if !is_square(from) || !is_square(to) {
        bail!("unrecognised input: {text} (type `help`)");
    }

    let promotion = match suffix.chars().next() {
        None => None,
        Some(c) => Some(
            Promotion::from_char(c).with_context(|| format!("unknown promotion piece {c}"))?,
        ),
    };
    Ok(Input::Move {
        from: from.to_string(),
        to: to.to_string(),
        promotion,
    })
}

fn is_square(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 2 && (b'a'..=b'h').contains(&b[0]) && (b'1'..=b'8').contains(&b[1])
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;
