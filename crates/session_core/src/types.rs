//! Shared value types for the session

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// Why a game ended. The `Display` form is the text shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Checkmate { loser: Side },
    Draw,
    TimeForfeit { winner: Side },
    Surrender { side: Side },
}

impl EndReason {
    /// Winning side, `None` for a draw
    pub fn winner(&self) -> Option<Side> {
        match *self {
            EndReason::Checkmate { loser } => Some(loser.other()),
            EndReason::Draw => None,
            EndReason::TimeForfeit { winner } => Some(winner),
            EndReason::Surrender { side } => Some(side.other()),
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Checkmate { loser } => write!(f, "Game over, {loser} is in checkmate."),
            EndReason::Draw => write!(f, "Game over, drawn position."),
            EndReason::TimeForfeit { winner } => write!(f, "{winner} wins on time!"),
            EndReason::Surrender { side } => {
                write!(f, "{side} surrenders. {} wins!", side.other())
            }
        }
    }
}

/// Game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    NotStarted,
    InProgress,
    Ended(EndReason),
}

impl Lifecycle {
    pub fn is_ended(&self) -> bool {
        matches!(self, Lifecycle::Ended(_))
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self {
            Lifecycle::Ended(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Time control presets offered before a game starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    #[default]
    Unlimited,
    Blitz,
    Rapid,
    Classical,
}

impl TimeMode {
    pub const ALL: [TimeMode; 4] = [
        TimeMode::Unlimited,
        TimeMode::Blitz,
        TimeMode::Rapid,
        TimeMode::Classical,
    ];

    /// Starting time per side in seconds; 0 means untracked
    pub fn seconds(self) -> u32 {
        match self {
            TimeMode::Unlimited => 0,
            TimeMode::Blitz => 5 * 60,
            TimeMode::Rapid => 15 * 60,
            TimeMode::Classical => 30 * 60,
        }
    }

    pub fn is_unlimited(self) -> bool {
        self == TimeMode::Unlimited
    }
}

impl fmt::Display for TimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeMode::Unlimited => write!(f, "unlimited"),
            TimeMode::Blitz => write!(f, "blitz"),
            TimeMode::Rapid => write!(f, "rapid"),
            TimeMode::Classical => write!(f, "classical"),
        }
    }
}

impl FromStr for TimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unlimited" => Ok(TimeMode::Unlimited),
            "blitz" => Ok(TimeMode::Blitz),
            "rapid" => Ok(TimeMode::Rapid),
            "classical" => Ok(TimeMode::Classical),
            other => Err(format!("unknown time mode: {other}")),
        }
    }
}

/// Piece chosen when a pawn reaches the last rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Promotion {
    #[default]
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Lowercase coordinate-notation suffix
    pub fn as_char(self) -> char {
        match self {
            Promotion::Queen => 'q',
            Promotion::Rook => 'r',
            Promotion::Bishop => 'b',
            Promotion::Knight => 'n',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(Promotion::Queen),
            'r' => Some(Promotion::Rook),
            'b' => Some(Promotion::Bishop),
            'n' => Some(Promotion::Knight),
            _ => None,
        }
    }
}

/// A move as the rules engine applied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Standard Algebraic Notation representation
    pub san: String,
    /// Coordinate form, e.g. `e2e4` or `e7e8q`
    pub uci: String,
}
