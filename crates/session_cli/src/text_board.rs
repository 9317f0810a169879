//! Plain-text board widget

use session_core::{BoardWidget, ClockDisplay, Side};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Prints the board whenever the shown position changes
#[derive(Debug, Default)]
pub struct TextBoard {
    fen: String,
    status: String,
    clock: Option<ClockDisplay>,
    moves: Vec<String>,
    shown: Option<usize>,
    /// Suppress printing; used by tests
    quiet: bool,
}

impl TextBoard {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Self::default()
        }
    }

    /// Color of the piece on a square of the shown position
    pub fn piece_at(&self, square: &str) -> Option<Side> {
        let bytes = square.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].checked_sub(b'a')? as usize;
        let rank = bytes[1].checked_sub(b'1')? as usize;
        if file > 7 || rank > 7 {
            return None;
        }
        let piece = placement_rows(&self.fen).get(7 - rank)?[file]?;
        Some(if piece.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        })
    }

    /// Board diagram with White at the bottom
    pub fn render(&self) -> String {
        let mut out = String::from("  +-----------------+\n");
        for (i, row) in placement_rows(&self.fen).iter().enumerate() {
            out.push_str(&format!("{} |", 8 - i));
            for square in row {
                out.push(' ');
                out.push(square.unwrap_or('.'));
            }
            out.push_str(" |\n");
        }
        out.push_str("  +-----------------+\n    a b c d e f g h");
        out
    }

    pub fn status_line(&self) -> String {
        match &self.clock {
            Some(clock) => format!(
                "[White {}{} | Black {}{}] {}",
                clock.white,
                if clock.running == Some(Side::White) { "*" } else { "" },
                clock.black,
                if clock.running == Some(Side::Black) { "*" } else { "" },
                self.status
            ),
            None => self.status.clone(),
        }
    }

    /// Numbered move list with the shown move marked
    pub fn move_list(&self) -> String {
        if self.moves.is_empty() {
            return "no moves yet".to_string();
        }
        self.moves
            .iter()
            .enumerate()
            .map(|(i, san)| {
                let number = if i % 2 == 0 {
                    format!("{}. ", i / 2 + 1)
                } else {
                    String::new()
                };
                let marker = if Some(i) == self.shown { "<" } else { "" };
                format!("{number}{san}{marker}")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn print(&self, text: &str) {
        if !self.quiet {
            println!("{text}");
        }
    }
}

impl BoardWidget for TextBoard {
    fn set_position(&mut self, fen: &str) {
        if self.fen != fen {
            self.fen = fen.to_string();
            self.print(&self.render());
        }
    }

    fn reset_to_start(&mut self) {
        self.set_position(START_FEN);
    }

    fn show_clock(&mut self, clock: &ClockDisplay) {
        self.clock = Some(clock.clone());
    }

    fn show_status(&mut self, status: &str) {
        if self.status != status {
            self.status = status.to_string();
            self.print(&self.status_line());
        }
    }

    fn show_moves(&mut self, moves: &[String], shown: Option<usize>) {
        self.moves = moves.to_vec();
        self.shown = shown;
    }
}

/// Eight rows of the FEN placement field, rank 8 first
fn placement_rows(fen: &str) -> Vec<[Option<char>; 8]> {
    let placement = fen.split_whitespace().next().unwrap_or_default();
    placement
        .split('/')
        .take(8)
        .map(|rank| {
            let mut row = [None; 8];
            let mut file = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else if file < 8 {
                    row[file] = Some(c);
                    file += 1;
                }
            }
            row
        })
        .collect()
}

#[cfg(test)]
#[path = "text_board_tests.rs"]
mod text_board_tests;
