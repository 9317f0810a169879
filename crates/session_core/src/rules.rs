//! Rules engine boundary.
//!
//! [`RulesAdapter`] is everything the controller needs from a chess
//! rules engine. [`CozyRules`] implements it on top of `cozy-chess`,
//! adding SAN history and the draw rules the board type leaves to its
//! caller (repetition, insufficient material).

use cozy_chess::{BitBoard, Board, Color, GameStatus, Move, Piece, Square};

use crate::error::RulesError;
use crate::types::{MoveRecord, Promotion, Side};

/// Contract the session controller relies on from a rules engine.
///
/// The engine's own side-to-move is the only thing preventing a second
/// White move while the recommender is thinking, so implementations must
/// reject moves for the side that is not on turn.
pub trait RulesAdapter {
    /// Strict move from square names; `None` if illegal
    fn apply_move(&mut self, from: &str, to: &str, promotion: Promotion) -> Option<MoveRecord>;

    /// Best-effort parse of coordinate or SAN text; `None` if nothing matches
    fn apply_move_lenient(&mut self, notation: &str) -> Option<MoveRecord>;

    fn current_turn(&self) -> Side;

    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    fn is_checkmate(&self) -> bool;

    fn is_draw(&self) -> bool;

    fn is_check(&self) -> bool;

    /// FEN of the current position
    fn position_notation(&self) -> String;

    /// SAN of every move played since the starting position
    fn move_history(&self) -> Vec<String>;

    fn move_count(&self) -> usize {
        self.move_history().len()
    }

    /// Squares the piece on `from` may legally move to
    fn legal_destinations(&self, from: &str) -> Vec<String>;

    /// Back to the starting position
    fn reset(&mut self);

    /// A new engine at the same starting position, sharing no state
    fn fresh(&self) -> Self
    where
        Self: Sized;
}

/// Rules engine backed by `cozy_chess::Board`
#[derive(Debug, Clone)]
pub struct CozyRules {
    start: Board,
    board: Board,
    history: Vec<MoveRecord>,
    /// Position hash history for threefold repetition detection
    position_history: Vec<u64>,
}

impl Default for CozyRules {
    fn default() -> Self {
        Self::with_start(Board::default())
    }
}

impl CozyRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary position
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let board = Board::from_fen(fen.trim(), false).map_err(|e| RulesError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{e:?}"),
        })?;
        Ok(Self::with_start(board))
    }

    fn with_start(start: Board) -> Self {
        let initial_hash = start.hash();
        Self {
            board: start.clone(),
            start,
            history: Vec::new(),
            position_history: vec![initial_hash],
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.history
    }

    fn play(&mut self, mv: Move) -> MoveRecord {
        let record = MoveRecord {
            san: san_for(&self.board, mv),
            uci: uci_for(&self.board, mv),
        };
        self.board.play(mv);
        self.history.push(record.clone());
        self.position_history.push(self.board.hash());
        record
    }

    /// Find a legal move by origin, displayed destination and promotion
    fn find_move(&self, from: Square, to: Square, promotion: Option<Piece>) -> Option<Move> {
        legal_moves(&self.board).into_iter().find(|&mv| {
            mv.from == from
                && display_destination(&self.board, mv) == to
                && (mv.promotion.is_none() || mv.promotion == promotion)
        })
    }

    /// Coordinate form: `e2e4`, `e2-e4`, `e7e8q`, `Ng1f3`
    fn find_coordinate_move(&self, text: &str) -> Option<Move> {
        let text: String = text.chars().filter(|c| *c != '-').collect();
        if !text.is_ascii() {
            return None;
        }
        // `B7B8Q` is a b-file pawn, `Bf1c4` a bishop: squares win
        self.find_bare_coordinate_move(&text).or_else(|| {
            let piece_stripped = text.strip_prefix(['N', 'B', 'R', 'Q', 'K'])?;
            self.find_bare_coordinate_move(piece_stripped)
        })
    }

    /// `e2e4` or `e7e8q`, any case
    fn find_bare_coordinate_move(&self, text: &str) -> Option<Move> {
        let text = text.to_ascii_lowercase();
        if !(text.len() == 4 || text.len() == 5) {
            return None;
        }

        let from: Square = text[0..2].parse().ok()?;
        let to: Square = text[2..4].parse().ok()?;
        let promotion = match text[4..].chars().next() {
            Some(c) => Some(promotion_piece(Promotion::from_char(c)?)),
            // A bare pawn push to the last rank promotes to a queen
            None => Some(Piece::Queen),
        };
        self.find_move(from, to, promotion)
    }

    fn find_san_move(&self, text: &str) -> Option<Move> {
        let wanted = normalize_san(text);
        if wanted.is_empty() {
            return None;
        }
        legal_moves(&self.board)
            .into_iter()
            .find(|&mv| normalize_san(&san_for(&self.board, mv)) == wanted)
    }

    fn is_threefold_repetition(&self) -> bool {
        let current_hash = self.board.hash();
        let count = self
            .position_history
            .iter()
            .filter(|&&h| h == current_hash)
            .count();
        count >= 3
    }
}

impl RulesAdapter for CozyRules {
    fn apply_move(&mut self, from: &str, to: &str, promotion: Promotion) -> Option<MoveRecord> {
        let from: Square = from.trim().to_ascii_lowercase().parse().ok()?;
        let to: Square = to.trim().to_ascii_lowercase().parse().ok()?;
        let mv = self.find_move(from, to, Some(promotion_piece(promotion)))?;
        Some(self.play(mv))
    }

    fn apply_move_lenient(&mut self, notation: &str) -> Option<MoveRecord> {
        let text = notation.trim().trim_end_matches(['+', '#', '!', '?']);
        let mv = self
            .find_coordinate_move(text)
            .or_else(|| self.find_san_move(text))?;
        Some(self.play(mv))
    }

    fn current_turn(&self) -> Side {
        side_of(self.board.side_to_move())
    }

    fn is_checkmate(&self) -> bool {
        matches!(self.board.status(), GameStatus::Won)
    }

    fn is_draw(&self) -> bool {
        matches!(self.board.status(), GameStatus::Drawn)
            || self.board.halfmove_clock() >= 100
            || self.is_threefold_repetition()
            || is_insufficient_material(&self.board)
    }

    fn is_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    fn position_notation(&self) -> String {
        self.board.to_string()
    }

    fn move_history(&self) -> Vec<String> {
        self.history.iter().map(|r| r.san.clone()).collect()
    }

    fn move_count(&self) -> usize {
        self.history.len()
    }

    fn legal_destinations(&self, from: &str) -> Vec<String> {
        let Ok(from) = from.trim().to_ascii_lowercase().parse::<Square>() else {
            return Vec::new();
        };
        let mut destinations: Vec<String> = Vec::new();
        for mv in legal_moves(&self.board) {
            if mv.from != from {
                continue;
            }
            let to = display_destination(&self.board, mv).to_string();
            // Promotions produce several moves to one square
            if !destinations.contains(&to) {
                destinations.push(to);
            }
        }
        destinations
    }

    fn reset(&mut self) {
        *self = Self::with_start(self.start.clone());
    }

    fn fresh(&self) -> Self {
        Self::with_start(self.start.clone())
    }
}

fn side_of(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn promotion_piece(promotion: Promotion) -> Piece {
    match promotion {
        Promotion::Queen => Piece::Queen,
        Promotion::Rook => Piece::Rook,
        Promotion::Bishop => Piece::Bishop,
        Promotion::Knight => Piece::Knight,
    }
}

fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    board.generate_moves(|piece_moves| {
        moves.extend(piece_moves);
        false
    });
    moves
}

fn file_of(sq: Square) -> usize {
    sq as usize % 8
}

fn rank_of(sq: Square) -> usize {
    sq as usize / 8
}

fn square_at(file: usize, rank: usize) -> Square {
    let name = format!("{}{}", (b'a' + file as u8) as char, (b'1' + rank as u8) as char);
    name.parse().unwrap_or(Square::A1)
}

/// cozy-chess encodes castling as the king capturing its own rook
fn is_castle(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King)
        && board.color_on(mv.to) == Some(board.side_to_move())
}

/// Destination as a player sees it: the king's landing square when castling
fn display_destination(board: &Board, mv: Move) -> Square {
    if is_castle(board, mv) {
        let file = if file_of(mv.to) > file_of(mv.from) { 6 } else { 2 };
        square_at(file, rank_of(mv.from))
    } else {
        mv.to
    }
}

fn uci_for(board: &Board, mv: Move) -> String {
    let mut uci = format!("{}{}", mv.from, display_destination(board, mv));
    if let Some(piece) = mv.promotion {
        uci.push(piece_letter(piece).to_ascii_lowercase());
    }
    uci
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::King => 'K',
        Piece::Queen => 'Q',
        Piece::Rook => 'R',
        Piece::Bishop => 'B',
        Piece::Knight => 'N',
        Piece::Pawn => 'P',
    }
}

/// Standard Algebraic Notation for a legal move, with check suffix
fn san_for(board: &Board, mv: Move) -> String {
    let mut san = String::new();

    if is_castle(board, mv) {
        if file_of(mv.to) > file_of(mv.from) {
            san.push_str("O-O");
        } else {
            san.push_str("O-O-O");
        }
    } else {
        let Some(piece) = board.piece_on(mv.from) else {
            return uci_for(board, mv);
        };
        let is_capture = board.color_on(mv.to).is_some()
            || (piece == Piece::Pawn && file_of(mv.from) != file_of(mv.to));

        if piece != Piece::Pawn {
            san.push(piece_letter(piece));
            san.push_str(&disambiguation(board, mv, piece));
        }

        if is_capture {
            if piece == Piece::Pawn {
                san.push((b'a' + file_of(mv.from) as u8) as char);
            }
            san.push('x');
        }

        san.push_str(&mv.to.to_string());

        if let Some(promo) = mv.promotion {
            san.push('=');
            san.push(piece_letter(promo));
        }
    }

    let mut after = board.clone();
    after.play(mv);
    if !after.checkers().is_empty() {
        san.push(if matches!(after.status(), GameStatus::Won) { '#' } else { '+' });
    }
    san
}

/// File, rank or full square needed to tell `mv` apart from twins
fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    let mut rivals = Vec::new();
    board.generate_moves(|piece_moves| {
        if piece_moves.piece == piece
            && piece_moves.from != mv.from
            && piece_moves.to.into_iter().any(|sq| sq == mv.to)
        {
            rivals.push(piece_moves.from);
        }
        false
    });

    if rivals.is_empty() {
        return String::new();
    }
    let file = (b'a' + file_of(mv.from) as u8) as char;
    let rank = (b'1' + rank_of(mv.from) as u8) as char;
    if rivals.iter().all(|&sq| file_of(sq) != file_of(mv.from)) {
        file.to_string()
    } else if rivals.iter().all(|&sq| rank_of(sq) != rank_of(mv.from)) {
        rank.to_string()
    } else {
        format!("{file}{rank}")
    }
}

/// SAN with decorations stripped, so `exd5`, `ed5` style variants compare equal
fn normalize_san(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, 'x' | '+' | '#' | '=' | '!' | '?' | '-' | ' '))
        .map(|c| if c == '0' { 'O' } else { c })
        .collect()
}

fn is_light_square(sq: Square) -> bool {
    (file_of(sq) + rank_of(sq)) % 2 == 1
}

/// No sequence of legal moves can produce mate
fn is_insufficient_material(board: &Board) -> bool {
    let heavy = board.pieces(Piece::Pawn) | board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    if !heavy.is_empty() {
        return false;
    }

    let knights = board.pieces(Piece::Knight);
    let bishops = board.pieces(Piece::Bishop);
    if knights.len() + bishops.len() <= 1 {
        return true;
    }

    // Bishops only, all on one square colour
    if knights.is_empty() {
        let light = bishops_on(bishops, true);
        return light == 0 || light == bishops.len();
    }
    false
}

fn bishops_on(bishops: BitBoard, light: bool) -> u32 {
    bishops
        .into_iter()
        .filter(|&sq| is_light_square(sq) == light)
        .count() as u32
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
