//! Terminal chess session
//!
//! Type moves for White; Black's replies come from the best-move
//! service configured with `--url` or the config file.

mod cli;
mod input;
mod text_board;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use session_core::{
    resolve, CozyRules, Command, DragCandidate, Event, HttpRecommender, SessionConfig,
    SessionController, SessionError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use input::Input;
use text_board::TextBoard;

type Controller = SessionController<CozyRules, TextBoard>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(url) = cli.url {
        config.recommender.base_url = url;
    }
    if let Some(mode) = cli.mode {
        config.clock.mode = mode;
    }
    if cli.time_limit.is_some() {
        config.recommender.time_limit = cli.time_limit;
    }

    let default_filter = config.log_filter.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let recommender = Arc::new(HttpRecommender::new(&config.recommender)?);
    match recommender.health().await {
        Ok(reply) => info!(status = %reply.status, "best-move service reachable"),
        Err(err) => warn!(%err, url = recommender.base_url(), "best-move service not reachable"),
    }

    let controller = SessionController::new(CozyRules::new(), TextBoard::new(), config.clock.mode);
    println!("{}", input::HELP);
    run(controller, recommender).await
}

/// Event loop: stdin lines, one-second ticks and resolved recommender calls
async fn run(mut controller: Controller, recommender: Arc<HttpRecommender>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticking = controller.clock().running_side();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match input::parse(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => handle_input(&mut controller, input, &recommender, &tx),
                    Err(err) => println!("{err}"),
                }
            }
            _ = ticker.tick() => {
                if controller.clock().is_running() {
                    dispatch(&mut controller, Event::ClockTick, &recommender, &tx);
                }
            }
            Some(event) = rx.recv() => {
                dispatch(&mut controller, event, &recommender, &tx);
            }
        }

        // A side's first second starts when its clock does
        let running = controller.clock().running_side();
        if running != ticking {
            ticker.reset();
            ticking = running;
        }
    }

    info!("session closed");
    Ok(())
}

fn handle_input(
    controller: &mut Controller,
    input: Input,
    recommender: &Arc<HttpRecommender>,
    tx: &mpsc::UnboundedSender<Event>,
) {
    let event = match input {
        Input::Move {
            from,
            to,
            promotion,
        } => {
            if !controller.ledger().is_live() {
                controller.view_current();
            }
            let Some(piece) = controller.board().piece_at(&from) else {
                println!("no piece on {from}");
                return;
            };
            if let Err(err) = controller.update(Event::PickUp(DragCandidate::new(&from, piece))) {
                println!("{err}");
                return;
            }
            Event::Drop {
                from,
                to,
                promotion,
            }
        }
        Input::NewGame => Event::NewGame,
        Input::Surrender => Event::Surrender,
        Input::Mode(mode) => Event::ChangeMode(mode),
        Input::View(index) => Event::ViewAt(index),
        Input::Live => Event::ViewCurrent,
        Input::Moves => {
            println!("{}", controller.board().move_list());
            return;
        }
        Input::Board => {
            println!("{}", controller.board().render());
            println!("{}", controller.board().status_line());
            return;
        }
        Input::Help => {
            println!("{}", input::HELP);
            return;
        }
        Input::Quit => return,
    };
    dispatch(controller, event, recommender, tx);
}

/// Feed one event to the controller and carry out the command it returns
fn dispatch(
    controller: &mut Controller,
    event: Event,
    recommender: &Arc<HttpRecommender>,
    tx: &mpsc::UnboundedSender<Event>,
) {
    match controller.update(event) {
        Ok(Command::None) => {}
        Ok(Command::RequestBestMove(request)) => {
            println!("Black is thinking...");
            let recommender = Arc::clone(recommender);
            let tx = tx.clone();
            tokio::spawn(async move {
                let event = resolve(recommender.as_ref(), request).await;
                if tx.send(event).is_err() {
                    debug!("session closed before the recommender answered");
                }
            });
        }
        Err(SessionError::StaleRecommenderResponse) => {
            debug!("late recommender answer ignored");
        }
        Err(err @ SessionError::RecommenderTransport(_)) => {
            println!("{err}; surrender or start a new game to continue");
        }
        Err(err) => println!("{err}"),
    }
}
