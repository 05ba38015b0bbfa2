//! Runtime: event loop and effect execution for the console.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Multiplex terminal input, animation ticks, auto-refresh and finished
//!   service calls in a single `tokio::select!` loop.
//! - Turn `Effect`s into spawned service calls whose results come back as
//!   `Msg`s.
//! - Render only when `App` marks itself dirty.
//!
//! Ticking is fast (100 ms) while a load or action is outstanding and slow
//! (1 s) otherwise, which is still frequent enough to expire toasts.

use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flowdeck_api::ExecutionService;
use flowdeck_engine::{ActionKind, ExecutionListController};
use flowdeck_util::UserPreferences;
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    task::JoinHandle,
    time::{self, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::{App, Effect, Msg};
use crate::ui::main_component::MainView;

const FAST_TICK: Duration = Duration::from_millis(100);
const IDLE_TICK: Duration = Duration::from_millis(1000);

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn ticker(period: Duration) -> Interval {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Waits for the next auto-refresh tick, or forever when auto-refresh is off.
async fn next_auto_refresh(interval: &mut Option<Interval>) {
    match interval.as_mut() {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn run_effect(service: Arc<dyn ExecutionService>, effect: Effect) -> Msg {
    match effect {
        Effect::LoadExecutions(ticket) => {
            let result = service.list(ticket.filter()).await;
            Msg::LoadCompleted { ticket, result }
        }
        Effect::SendAction { kind, record_id } => {
            let result = match kind {
                ActionKind::Retry => service.retry(&record_id).await,
                ActionKind::Cancel => service.cancel(&record_id).await,
            };
            Msg::ActionCompleted { record_id, result }
        }
        Effect::FetchDetail(record_id) => {
            let result = service.get(&record_id).await;
            Msg::DetailLoaded { record_id, result }
        }
    }
}

/// Spawns the service call for one effect. The task always resolves to the
/// message that reports its result; a call that panics or is aborted is
/// reported as a failed completion for the same effect.
fn spawn_effect(service: Arc<dyn ExecutionService>, effect: Effect) -> JoinHandle<Msg> {
    let call = tokio::spawn(run_effect(service, effect.clone()));
    tokio::spawn(async move {
        match call.await {
            Ok(msg) => msg,
            Err(error) => {
                warn!(error = %error, ?effect, "service task failed");
                effect.into_failure(format!("service task failed: {error}"))
            }
        }
    })
}

/// Entry point for the console: sets up the terminal, runs the event loop,
/// and restores the terminal on exit.
pub async fn run_app(controller: ExecutionListController, preferences: Arc<UserPreferences>) -> Result<()> {
    let service = controller.service();
    let mut app = App::new(controller, Arc::clone(&preferences));
    let mut main_view = MainView::new();
    let mut terminal = setup_terminal()?;

    let mut events = EventStream::new();
    let mut pending: FuturesUnordered<JoinHandle<Msg>> = FuturesUnordered::new();

    let mut auto_refresh = preferences.auto_refresh_interval().map(|period| {
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    });
    info!(
        auto_refresh_seconds = auto_refresh.as_ref().map(|i| i.period().as_secs()).unwrap_or(0),
        filter = %app.controller.filter(),
        "console started"
    );

    for effect in app.startup_effects() {
        pending.push(spawn_effect(Arc::clone(&service), effect));
    }

    let mut current_tick = IDLE_TICK;
    let mut tick = ticker(current_tick);

    app.take_dirty();
    if let Err(error) = render(&mut terminal, &mut app, &mut main_view) {
        cleanup_terminal(&mut terminal)?;
        return Err(error);
    }

    let result = loop {
        let wanted = if app.is_busy() { FAST_TICK } else { IDLE_TICK };
        if wanted != current_tick {
            current_tick = wanted;
            tick = ticker(current_tick);
        }

        let effects = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    main_view.handle_key_events(&mut app, key)
                }
                Some(Ok(Event::Resize(..))) => main_view.handle_message(&mut app, Msg::Resize),
                Some(Ok(_)) => Vec::new(),
                Some(Err(error)) => {
                    warn!(error = %error, "failed to read terminal event");
                    Vec::new()
                }
                None => break Ok(()),
            },
            _ = tick.tick() => main_view.handle_message(&mut app, Msg::Tick),
            _ = next_auto_refresh(&mut auto_refresh) => main_view.handle_message(&mut app, Msg::AutoRefresh),
            Some(joined) = pending.next(), if !pending.is_empty() => match joined {
                Ok(msg) => main_view.handle_message(&mut app, msg),
                Err(error) => {
                    warn!(error = %error, "effect supervisor failed");
                    Vec::new()
                }
            },
            _ = signal::ctrl_c() => break Ok(()),
        };

        for effect in effects {
            debug!(?effect, "dispatching effect");
            pending.push(spawn_effect(Arc::clone(&service), effect));
        }

        if app.should_quit {
            break Ok(());
        }
        if app.take_dirty()
            && let Err(error) = render(&mut terminal, &mut app, &mut main_view)
        {
            break Err(error);
        }
    };

    cleanup_terminal(&mut terminal)?;
    info!("console closed");
    result
}
