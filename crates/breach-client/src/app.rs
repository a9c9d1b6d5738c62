//! Terminal frame loop.
//!
//! Input arrives on a crossterm event stream and is buffered; once per
//! frame the buffer is drained in order, the session clock advances, and
//! the screen is redrawn.

use crate::input::{self, Command};
use crate::ui;
use breach_core::{GameEvent, Intent, Millis, ScoreSink, Session};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Roughly 60 frames a second
const FRAME: Duration = Duration::from_millis(16);

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Put the terminal into raw, alternate-screen mode with mouse capture
pub fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Undo [`setup_terminal`]
pub fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}

/// Run the session until the player quits. The terminal is restored even
/// when the loop fails.
pub async fn run<S: ScoreSink>(session: &mut Session<S>) -> anyhow::Result<()> {
    let mut terminal = setup_terminal()?;
    let result = frame_loop(&mut terminal, session).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        warn!("Failed to restore terminal: {}", e);
    }
    result
}

async fn frame_loop<S: ScoreSink>(terminal: &mut Tui, session: &mut Session<S>) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut pending: Vec<Event> = Vec::new();
    let mut grid = Rect::default();

    info!("Frame loop started");

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = elapsed_millis(started);
                if step_frame(session, &mut pending, grid, now) == FrameOutcome::Quit {
                    info!("Quit requested");
                    return Ok(());
                }

                let game = session.game();
                terminal.draw(|f| grid = ui::draw(f, game, now))?;
            }
            next = events.next() => match next {
                Some(Ok(event)) => pending.push(event),
                Some(Err(e)) => return Err(e.into()),
                None => {
                    info!("Input stream closed");
                    return Ok(());
                }
            }
        }
    }
}

/// Whether the loop keeps running after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Apply every buffered event in arrival order, then advance the clock.
///
/// A quit stops the drain; events after it are discarded.
pub fn step_frame<S: ScoreSink>(
    session: &mut Session<S>,
    pending: &mut Vec<Event>,
    grid: Rect,
    now: Millis,
) -> FrameOutcome {
    for event in pending.drain(..) {
        match input::map_event(&event, session.game(), grid) {
            Some(Command::Quit) => return FrameOutcome::Quit,
            Some(Command::Apply(intent)) => apply_intent(session, intent),
            None => {}
        }
    }

    for event in session.tick(now) {
        log_event(&event);
    }
    FrameOutcome::Continue
}

fn elapsed_millis(started: Instant) -> Millis {
    Millis::try_from(started.elapsed().as_millis()).unwrap_or(Millis::MAX)
}

fn apply_intent<S: ScoreSink>(session: &mut Session<S>, intent: Intent) {
    match session.apply(intent.clone()) {
        Ok(events) => events.iter().for_each(log_event),
        Err(e) => debug!(?intent, "Intent rejected: {}", e),
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::GameWon => info!("Exit breached"),
        GameEvent::GameLost => info!("Signal lost"),
        GameEvent::GameFinished { won, final_score } => {
            info!(won, final_score, "Game finished")
        }
        GameEvent::LoreCollected { coord, total } => {
            info!(%coord, total, "Lore collected")
        }
        GameEvent::ScoreCommitted(entry) => {
            info!(name = %entry.name, score = entry.score, "Score committed")
        }
        GameEvent::RestartRequested => info!("Restart requested"),
        other => debug!(event = ?other, "Game event"),
    }
}
