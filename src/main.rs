//! Terminal reef runner (default binary).
//!
//! This is the primary gameplay entrypoint.
//! It uses crossterm for input and a custom framebuffer-based renderer
//! (no ratatui widgets/layout). The optional remote-control adapter is
//! polled from the same loop, so keyboard and remote clients drive one
//! shared session.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tui_reef::adapter::{
    build_ack_ok, build_ack_rejected, build_error, build_observation, build_session_end, now_ms,
    to_line, Adapter, ClientCommand, InboundCommand, OutboundMessage,
};
use tui_reef::core::{Session, SwapResult, TickResult};
use tui_reef::engine::find_first_hint;
use tui_reef::input::{handle_key_event, should_quit, Cursor, SelectOutcome};
use tui_reef::term::{FrameBuffer, GameView, TerminalRenderer, UiOverlay, Viewport};
use tui_reef::types::{GameAction, Outcome, Pos, GRID_HEIGHT, GRID_WIDTH, TICK_SECONDS};

fn main() -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Seed from `REEF_SEED`, else from the clock.
fn pick_seed() -> u32 {
    if let Some(seed) = std::env::var("REEF_SEED").ok().and_then(|s| s.parse().ok()) {
        return seed;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() | 1)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let mut session = Session::new(pick_seed());
    session.start_level(1);

    let mut adapter = Adapter::start_from_env(GRID_WIDTH, GRID_HEIGHT);
    let view = GameView::default();
    let mut cursor = Cursor::new(GRID_WIDTH, GRID_HEIGHT);
    let mut hint: Option<(Pos, Pos)> = None;
    let mut fb = FrameBuffer::new(80, 24);
    let mut obs_seq: u64 = 0;

    let tick_duration = Duration::from_secs(TICK_SECONDS as u64);
    // Keep the loop responsive to remote commands between 1-second ticks.
    let poll_cap = Duration::from_millis(50);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let ui = UiOverlay {
            cursor: Some(cursor.pos()),
            selected: cursor.selected(),
            hint,
            adapter_clients: adapter.as_ref().map(|a| a.client_count() as u16),
        };
        view.render_into(&session.snapshot(), &ui, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Remote commands.
        if let Some(adapter) = adapter.as_mut() {
            while let Some(cmd) = adapter.try_recv() {
                handle_remote_command(&mut session, &mut cursor, &mut hint, adapter, cmd, &mut obs_seq);
            }
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0))
            .min(poll_cap);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        handle_action(&mut session, &mut cursor, &mut hint, action);
                        broadcast_observation(adapter.as_ref(), &session, &mut obs_seq);
                    }
                }
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            match session.tick() {
                TickResult::Ended(outcome) => {
                    notify_session_end(adapter.as_ref(), &session, outcome, &mut obs_seq);
                }
                TickResult::Running { .. } => {
                    broadcast_observation(adapter.as_ref(), &session, &mut obs_seq);
                }
                TickResult::Inactive => {}
            }
        }
    }
}

/// Apply a keyboard action to the session and cursor.
fn handle_action(
    session: &mut Session,
    cursor: &mut Cursor,
    hint: &mut Option<(Pos, Pos)>,
    action: GameAction,
) {
    match action {
        GameAction::MoveUp | GameAction::MoveDown | GameAction::MoveLeft | GameAction::MoveRight => {
            cursor.apply_move(action);
        }
        GameAction::Select => {
            if let SelectOutcome::SwapRequested { a, b } = cursor.select() {
                // Rejections and errors are no-ops for keyboard play; the
                // selection highlight clearing is feedback enough.
                let _ = session.submit_swap(a, b);
                *hint = None;
            }
        }
        GameAction::Hint => {
            *hint = find_first_hint(session.grid()).map(|h| (h.a, h.b));
        }
        GameAction::Pause => session.toggle_pause(),
        GameAction::Restart => {
            if session.replay_level() {
                reset_view_state(session, cursor, hint);
            }
        }
        GameAction::NextLevel => {
            if session.advance_level() {
                reset_view_state(session, cursor, hint);
            }
        }
    }
}

fn reset_view_state(session: &Session, cursor: &mut Cursor, hint: &mut Option<(Pos, Pos)>) {
    cursor.resize(session.grid().width(), session.grid().height());
    *hint = None;
}

/// Execute one remote command and answer the controller.
fn handle_remote_command(
    session: &mut Session,
    cursor: &mut Cursor,
    hint: &mut Option<(Pos, Pos)>,
    adapter: &mut Adapter,
    cmd: InboundCommand,
    obs_seq: &mut u64,
) {
    let client_id = cmd.client_id;

    let reply = match cmd.command {
        ClientCommand::Swap { a, b } => match session.submit_swap(a, b) {
            Err(error) => to_line(&build_error(
                cmd.seq,
                now_ms(),
                error.code(),
                &error.to_string(),
            )),
            Ok(SwapResult::Rejected(reason)) => to_line(&build_ack_rejected(
                cmd.seq,
                now_ms(),
                reason.code(),
                reason.message(),
            )),
            Ok(SwapResult::NoMatch) => to_line(&build_ack_ok(cmd.seq, now_ms(), 0, 0)),
            Ok(SwapResult::Cascaded(rounds)) => {
                let score_delta = rounds.iter().map(|r| r.score_delta).sum();
                to_line(&build_ack_ok(cmd.seq, now_ms(), rounds.len() as u32, score_delta))
            }
        },
        ClientCommand::Action(action) => match action {
            GameAction::Pause => {
                session.toggle_pause();
                to_line(&build_ack_ok(cmd.seq, now_ms(), 0, 0))
            }
            GameAction::Restart => {
                if session.replay_level() {
                    reset_view_state(session, cursor, hint);
                    to_line(&build_ack_ok(cmd.seq, now_ms(), 0, 0))
                } else {
                    to_line(&build_ack_rejected(
                        cmd.seq,
                        now_ms(),
                        "not_started",
                        "no level to restart",
                    ))
                }
            }
            GameAction::NextLevel => {
                if session.advance_level() {
                    reset_view_state(session, cursor, hint);
                    to_line(&build_ack_ok(cmd.seq, now_ms(), 0, 0))
                } else {
                    to_line(&build_ack_rejected(
                        cmd.seq,
                        now_ms(),
                        "not_won",
                        "advancing requires a won level",
                    ))
                }
            }
            other => to_line(&build_ack_rejected(
                cmd.seq,
                now_ms(),
                "unsupported_action",
                other.as_str(),
            )),
        },
    };

    if let Some(line) = reply {
        adapter.send(OutboundMessage::ToClient { client_id, line });
    }
    broadcast_observation(Some(&*adapter), session, obs_seq);
}

fn broadcast_observation(adapter: Option<&Adapter>, session: &Session, obs_seq: &mut u64) {
    let Some(adapter) = adapter else {
        return;
    };
    *obs_seq += 1;
    if let Some(line) = to_line(&build_observation(*obs_seq, now_ms(), &session.snapshot())) {
        adapter.send(OutboundMessage::Broadcast { line });
    }
}

fn notify_session_end(
    adapter: Option<&Adapter>,
    session: &Session,
    outcome: Outcome,
    obs_seq: &mut u64,
) {
    let Some(adapter) = adapter else {
        return;
    };
    *obs_seq += 1;
    if let Some(line) = to_line(&build_session_end(
        *obs_seq,
        now_ms(),
        outcome,
        session.level_number(),
        session.score(),
    )) {
        adapter.send(OutboundMessage::Broadcast { line });
    }
    broadcast_observation(Some(&*adapter), session, obs_seq);
}
