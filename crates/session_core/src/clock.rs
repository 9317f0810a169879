//! Per-side countdown clock.
//!
//! The clock is driven from outside: whoever owns the event loop calls
//! [`Clock::tick`] once per wall-clock second. Only one side ever runs.

use crate::error::SessionError;
use crate::types::{Side, TimeMode};

/// Raised by [`Clock::tick`] when the running side's time reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeForfeit {
    pub winner: Side,
}

/// Renderable snapshot of both clocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockDisplay {
    pub white: String,
    pub black: String,
    pub running: Option<Side>,
}

/// Chess clock for both players
#[derive(Debug, Clone)]
pub struct Clock {
    mode: TimeMode,
    /// White's remaining time in seconds (0 under Unlimited)
    white_remaining: u32,
    /// Black's remaining time in seconds (0 under Unlimited)
    black_remaining: u32,
    /// Which side's clock is running
    running: Option<Side>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(TimeMode::default())
    }
}

impl Clock {
    pub fn new(mode: TimeMode) -> Self {
        Self {
            mode,
            white_remaining: mode.seconds(),
            black_remaining: mode.seconds(),
            running: None,
        }
    }

    /// Reset both sides to the starting time of `mode`.
    ///
    /// Refused while a side is running; the controller additionally
    /// refuses it once the game has started.
    pub fn configure(&mut self, mode: TimeMode) -> Result<(), SessionError> {
        if self.running.is_some() {
            return Err(SessionError::InvalidModeChange);
        }
        *self = Self::new(mode);
        Ok(())
    }

    /// Start the clock for a side, stopping whichever side was running
    pub fn start(&mut self, side: Side) {
        self.stop();
        if self.mode.is_unlimited() {
            return;
        }
        self.running = Some(side);
    }

    pub fn stop(&mut self) {
        self.running = None;
    }

    /// One second of wall-clock time for the running side
    pub fn tick(&mut self) -> Option<TimeForfeit> {
        let side = self.running?;
        let remaining = match side {
            Side::White => &mut self.white_remaining,
            Side::Black => &mut self.black_remaining,
        };
        *remaining = remaining.saturating_sub(1);

        if *remaining == 0 {
            self.running = None;
            Some(TimeForfeit {
                winner: side.other(),
            })
        } else {
            None
        }
    }

    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    pub fn running_side(&self) -> Option<Side> {
        self.running
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Remaining seconds for a side; 0 under Unlimited
    pub fn remaining(&self, side: Side) -> u32 {
        match side {
            Side::White => self.white_remaining,
            Side::Black => self.black_remaining,
        }
    }

    pub fn display(&self) -> ClockDisplay {
        ClockDisplay {
            white: self.format_side(Side::White),
            black: self.format_side(Side::Black),
            running: self.running,
        }
    }

    fn format_side(&self, side: Side) -> String {
        if self.mode.is_unlimited() {
            "∞".to_string()
        } else {
            Self::format_time(self.remaining(side))
        }
    }

    /// Format seconds as M:SS
    pub fn format_time(seconds: u32) -> String {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
