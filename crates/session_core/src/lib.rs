//! Session core for a single-player chess game.
//!
//! A human plays White against an external move recommender playing
//! Black. This crate owns the state around that exchange:
//! - game lifecycle (not started, in progress, ended)
//! - per-side countdown clocks
//! - the move ledger and its history-viewing cursor
//! - the request/response cycle with the recommender
//!
//! Chess rules live behind [`RulesAdapter`] and rendering behind
//! [`BoardWidget`]; the controller only talks to those traits.

pub mod board;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod ledger;
pub mod recommender;
pub mod rules;
pub mod types;

pub use board::*;
pub use clock::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use ledger::*;
pub use recommender::*;
pub use rules::*;
pub use types::*;
