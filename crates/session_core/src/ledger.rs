//! Move ledger with a display-only viewing cursor.
//!
//! The ledger mirrors the rules engine's history; the cursor only
//! decides which position the board shows.

use crate::error::SessionError;
use crate::rules::RulesAdapter;

/// Which position the board is displaying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewCursor {
    /// Follow the live game
    #[default]
    Live,
    /// Position after the move at this index
    At(usize),
}

/// Append-only move history
#[derive(Debug, Clone, Default)]
pub struct MoveLedger {
    played: Vec<String>,
    cursor: ViewCursor,
}

impl MoveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move the rules engine has already applied
    pub fn record(&mut self, notation: impl Into<String>) {
        self.played.push(notation.into());
    }

    /// Point the cursor at a historical move
    pub fn view_at(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.played.len() {
            return Err(SessionError::OutOfRangeView {
                index,
                len: self.played.len(),
            });
        }
        self.cursor = ViewCursor::At(index);
        Ok(())
    }

    /// Follow the live game again; returns whether the cursor moved
    pub fn view_current(&mut self) -> bool {
        let changed = self.cursor != ViewCursor::Live;
        self.cursor = ViewCursor::Live;
        changed
    }

    pub fn reset(&mut self) {
        self.played.clear();
        self.cursor = ViewCursor::Live;
    }

    pub fn moves(&self) -> &[String] {
        &self.played
    }

    pub fn len(&self) -> usize {
        self.played.len()
    }

    pub fn is_empty(&self) -> bool {
        self.played.is_empty()
    }

    pub fn cursor(&self) -> ViewCursor {
        self.cursor
    }

    pub fn is_live(&self) -> bool {
        self.cursor == ViewCursor::Live
    }

    /// Index of the last move shown; `None` before any move
    pub fn shown_index(&self) -> Option<usize> {
        match self.cursor {
            ViewCursor::At(index) => Some(index),
            ViewCursor::Live => self.played.len().checked_sub(1),
        }
    }

    /// Position notation for the historical cursor.
    ///
    /// Replays `moves[..=k]` on a fresh engine built from `rules`, so
    /// the live engine is never touched. `None` while following the live
    /// game or if a recorded move fails to replay.
    pub fn replay_position<R: RulesAdapter>(&self, rules: &R) -> Option<String> {
        let ViewCursor::At(index) = self.cursor else {
            return None;
        };
        let mut replay = rules.fresh();
        for notation in &self.played[..=index] {
            replay.apply_move_lenient(notation)?;
        }
        Some(replay.position_notation())
    }

    /// Move list grouped in pairs: `1. e4 e5`, `2. Nf3`
    pub fn numbered(&self) -> Vec<String> {
        self.played
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| match pair {
                [white, black] => format!("{}. {} {}", i + 1, white, black),
                [white] => format!("{}. {}", i + 1, white),
                _ => String::new(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;
