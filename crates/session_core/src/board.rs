//! Board widget boundary

use crate::clock::ClockDisplay;
use crate::types::Side;

/// Pick-up reported by the widget when the player grabs a piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragCandidate {
    pub source: String,
    pub piece: Side,
}

impl DragCandidate {
    pub fn new(source: impl Into<String>, piece: Side) -> Self {
        Self {
            source: source.into(),
            piece,
        }
    }
}

/// What the controller drives on the rendering side.
///
/// Only position updates are required; the display hooks default to
/// no-ops for widgets that render those elsewhere.
pub trait BoardWidget {
    /// Show the position given in FEN
    fn set_position(&mut self, fen: &str);

    fn reset_to_start(&mut self);

    fn show_clock(&mut self, _clock: &ClockDisplay) {}

    fn show_status(&mut self, _status: &str) {}

    /// Numbered move list plus the index of the move being shown
    fn show_moves(&mut self, _moves: &[String], _shown: Option<usize>) {}
}
