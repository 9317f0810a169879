//! Session controller: the game lifecycle state machine.
//!
//! All input arrives as an [`Event`] through [`SessionController::update`].
//! Handlers run to completion; the only suspension point is the
//! recommender call, which the controller hands back to its caller as a
//! [`Command`] and later receives as [`Event::BestMove`].

use tracing::{debug, error, info, warn};

use crate::board::{BoardWidget, DragCandidate};
use crate::clock::Clock;
use crate::error::{RecommenderError, SessionError};
use crate::ledger::MoveLedger;
use crate::recommender::{BestMoveRequest, RequestId};
use crate::rules::RulesAdapter;
use crate::types::{EndReason, Lifecycle, MoveRecord, Promotion, Side, TimeMode};

/// Input to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Board interaction
    PickUp(DragCandidate),
    Drop {
        from: String,
        to: String,
        promotion: Option<Promotion>,
    },

    // Timers and network
    ClockTick,
    BestMove {
        request: RequestId,
        outcome: Result<String, RecommenderError>,
    },

    // Game controls
    NewGame,
    Surrender,
    ChangeMode(TimeMode),

    // History navigation
    ViewAt(usize),
    ViewCurrent,
}

/// Work the caller must perform on the controller's behalf
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    #[default]
    None,
    RequestBestMove(BestMoveRequest),
}

/// Lifecycle plus the side on turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSession {
    pub lifecycle: Lifecycle,
    pub active_color: Side,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::NotStarted,
            active_color: Side::White,
        }
    }
}

/// Owns one game: session state, clock, ledger, rules engine and widget
pub struct SessionController<R, B> {
    session: GameSession,
    clock: Clock,
    ledger: MoveLedger,
    rules: R,
    board: B,
    /// Time mode applied on the next new game
    mode: TimeMode,
    next_request: RequestId,
    /// The one recommender request whose answer will be accepted
    pending: Option<RequestId>,
}

impl<R: RulesAdapter, B: BoardWidget> SessionController<R, B> {
    pub fn new(rules: R, board: B, mode: TimeMode) -> Self {
        let mut controller = Self {
            session: GameSession {
                lifecycle: Lifecycle::NotStarted,
                active_color: rules.current_turn(),
            },
            clock: Clock::new(mode),
            ledger: MoveLedger::new(),
            rules,
            board,
            mode,
            next_request: 1,
            pending: None,
        };
        let fen = controller.rules.position_notation();
        controller.board.set_position(&fen);
        controller.publish();
        controller
    }

    /// Single transition function
    pub fn update(&mut self, event: Event) -> Result<Command, SessionError> {
        match event {
            Event::PickUp(candidate) => self.pick_up(&candidate).map(|_| Command::None),
            Event::Drop {
                from,
                to,
                promotion,
            } => self.drop_piece(&from, &to, promotion),
            Event::ClockTick => self.tick().map(|_| Command::None),
            Event::BestMove { request, outcome } => self
                .apply_best_move(request, outcome)
                .map(|_| Command::None),
            Event::NewGame => {
                self.new_game();
                Ok(Command::None)
            }
            Event::Surrender => self.surrender().map(|_| Command::None),
            Event::ChangeMode(mode) => self.change_mode(mode).map(|_| Command::None),
            Event::ViewAt(index) => self.view_at(index).map(|_| Command::None),
            Event::ViewCurrent => {
                self.view_current();
                Ok(Command::None)
            }
        }
    }

    /// Drag-start gate; the first accepted pick-up starts the game
    pub fn pick_up(&mut self, candidate: &DragCandidate) -> Result<(), SessionError> {
        if self.session.lifecycle.is_ended() {
            return Err(SessionError::WrongLifecycle(self.session.lifecycle));
        }
        if candidate.piece == Side::Black {
            return Err(SessionError::InputRejected("black is moved by the recommender"));
        }
        if self.rules.is_game_over() {
            return Err(SessionError::InputRejected("game is over"));
        }
        if self.rules.legal_destinations(&candidate.source).is_empty() {
            debug!(square = %candidate.source, "pick-up with no legal destination");
            return Err(SessionError::InputRejected("no legal destination"));
        }

        if !self.ledger.is_live() {
            self.view_current();
        }
        if self.session.lifecycle == Lifecycle::NotStarted {
            self.session.lifecycle = Lifecycle::InProgress;
            self.clock.start(Side::White);
            info!(mode = %self.clock.mode(), "game started");
            self.publish();
        }
        Ok(())
    }

    /// Player drop; on success returns the recommender request to issue
    pub fn drop_piece(
        &mut self,
        from: &str,
        to: &str,
        promotion: Option<Promotion>,
    ) -> Result<Command, SessionError> {
        if self.session.lifecycle != Lifecycle::InProgress {
            self.snapback();
            return Err(SessionError::WrongLifecycle(self.session.lifecycle));
        }
        // The rules engine's side-to-move is the only double-move guard
        if self.rules.current_turn() != Side::White {
            self.snapback();
            return Err(SessionError::InputRejected("waiting for black's reply"));
        }

        let Some(record) = self
            .rules
            .apply_move(from, to, promotion.unwrap_or_default())
        else {
            warn!(from, to, "illegal move");
            self.snapback();
            return Err(SessionError::IllegalMove {
                from: from.to_string(),
                to: to.to_string(),
            });
        };

        self.after_move(record)?;
        if self.session.lifecycle == Lifecycle::InProgress {
            Ok(self.request_best_move())
        } else {
            Ok(Command::None)
        }
    }

    /// One wall-clock second
    pub fn tick(&mut self) -> Result<(), SessionError> {
        if self.session.lifecycle != Lifecycle::InProgress {
            return Ok(());
        }
        if let Some(forfeit) = self.clock.tick() {
            self.end(EndReason::TimeForfeit {
                winner: forfeit.winner,
            });
        } else {
            self.board.show_clock(&self.clock.display());
        }
        Ok(())
    }

    /// Apply the recommender's answer unless it is stale
    pub fn apply_best_move(
        &mut self,
        request: RequestId,
        outcome: Result<String, RecommenderError>,
    ) -> Result<(), SessionError> {
        if self.pending != Some(request) || self.session.lifecycle != Lifecycle::InProgress {
            warn!(
                request,
                lifecycle = ?self.session.lifecycle,
                "discarding stale recommender response"
            );
            return Err(SessionError::StaleRecommenderResponse);
        }
        self.pending = None;

        let notation = match outcome {
            Ok(notation) => notation,
            Err(err) => {
                warn!(request, %err, "error getting best move");
                return Err(err.into());
            }
        };

        let Some(record) = self.rules.apply_move_lenient(&notation) else {
            warn!(request, %notation, "recommended move rejected by rules engine");
            return Err(SessionError::UnplayableRecommendation(notation));
        };
        debug!(request, san = %record.san, "recommended move applied");
        self.after_move(record)
    }

    /// Reset everything and re-read the selected time mode
    pub fn new_game(&mut self) {
        if let Some(request) = self.pending.take() {
            debug!(request, "abandoning outstanding recommender request");
        }
        self.rules.reset();
        self.ledger.reset();
        self.clock = Clock::new(self.mode);
        self.session = GameSession {
            lifecycle: Lifecycle::NotStarted,
            active_color: self.rules.current_turn(),
        };
        self.board.reset_to_start();
        self.snapback();
        info!(mode = %self.mode, "new game");
        self.publish();
    }

    /// The human resigns
    pub fn surrender(&mut self) -> Result<(), SessionError> {
        if self.session.lifecycle.is_ended() {
            return Err(SessionError::WrongLifecycle(self.session.lifecycle));
        }
        self.end(EndReason::Surrender { side: Side::White });
        Ok(())
    }

    /// Select a time mode; only before the first move
    pub fn change_mode(&mut self, mode: TimeMode) -> Result<(), SessionError> {
        if self.session.lifecycle != Lifecycle::NotStarted {
            warn!(requested = %mode, current = %self.mode, "time mode change after start rejected");
            return Err(SessionError::InvalidModeChange);
        }
        self.clock.configure(mode)?;
        self.mode = mode;
        self.board.show_clock(&self.clock.display());
        Ok(())
    }

    /// Show the position after move `index` without touching the live game
    pub fn view_at(&mut self, index: usize) -> Result<(), SessionError> {
        self.ledger.view_at(index)?;
        match self.ledger.replay_position(&self.rules) {
            Some(fen) => self.board.set_position(&fen),
            None => {
                error!(index, "recorded moves failed to replay");
                self.ledger.view_current();
            }
        }
        self.board
            .show_moves(self.ledger.moves(), self.ledger.shown_index());
        Ok(())
    }

    /// Follow the live position again
    pub fn view_current(&mut self) {
        if self.ledger.view_current() {
            self.snapback();
            self.board
                .show_moves(self.ledger.moves(), self.ledger.shown_index());
        }
    }

    /// Status line for display
    pub fn status(&self) -> String {
        if let Lifecycle::Ended(reason) = self.session.lifecycle {
            return reason.to_string();
        }
        let side = self.rules.current_turn();
        let mut status = format!("{side} to move.");
        if self.rules.is_check() {
            status.push_str(&format!(" {side} is in check."));
        }
        status
    }

    pub fn can_surrender(&self) -> bool {
        !self.session.lifecycle.is_ended()
    }

    pub fn session(&self) -> GameSession {
        self.session
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.session.lifecycle
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Mode the next game will use
    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }

    /// Position the board should currently show
    pub fn displayed_position(&self) -> String {
        self.ledger
            .replay_position(&self.rules)
            .unwrap_or_else(|| self.rules.position_notation())
    }

    fn after_move(&mut self, record: MoveRecord) -> Result<(), SessionError> {
        self.ledger.record(record.san);
        self.ledger.view_current();
        self.session.active_color = self.rules.current_turn();
        self.snapback();

        if let Some(reason) = self.terminal_reason() {
            self.end(reason);
        } else {
            self.clock.start(self.session.active_color);
            self.publish();
        }
        self.verify_ledger()
    }

    fn terminal_reason(&self) -> Option<EndReason> {
        if self.rules.is_checkmate() {
            Some(EndReason::Checkmate {
                loser: self.rules.current_turn(),
            })
        } else if self.rules.is_draw() {
            Some(EndReason::Draw)
        } else {
            None
        }
    }

    fn end(&mut self, reason: EndReason) {
        self.session.lifecycle = Lifecycle::Ended(reason);
        self.clock.stop();
        self.pending = None;
        info!(%reason, "game ended");
        self.publish();
    }

    fn request_best_move(&mut self) -> Command {
        let id = self.next_request;
        self.next_request += 1;
        self.pending = Some(id);
        let fen = self.rules.position_notation();
        debug!(request = id, %fen, "requesting best move");
        Command::RequestBestMove(BestMoveRequest { id, fen })
    }

    fn verify_ledger(&self) -> Result<(), SessionError> {
        let engine = self.rules.move_count();
        if self.ledger.len() != engine {
            error!(ledger = self.ledger.len(), engine, "move ledger out of sync");
            return Err(SessionError::LedgerOutOfSync {
                ledger: self.ledger.len(),
                engine,
            });
        }
        Ok(())
    }

    /// Put the live position back on the board
    fn snapback(&mut self) {
        let fen = self.rules.position_notation();
        self.board.set_position(&fen);
    }

    fn publish(&mut self) {
        let status = self.status();
        self.board.show_clock(&self.clock.display());
        self.board.show_status(&status);
        self.board
            .show_moves(self.ledger.moves(), self.ledger.shown_index());
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
