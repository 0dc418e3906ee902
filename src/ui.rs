// src/ui.rs

pub mod chat;

use crate::api::CompletionClient;
use crate::app::App;
use crate::constants::TICK_RATE_MS;
use crate::errors::{ChatError, ChatResult};
use crate::key_handlers::{handle_chat_input, KeyAction};
use crate::models::Message;
use crossterm::{
    cursor::Show,
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io::{self, Stdout},
    sync::Arc,
    thread,
    time::Duration,
};
use tokio::sync::mpsc;

/// Events feeding the main loop.
enum Event {
    Input(CEvent),
    Tick,
    /// The input thread hit an error and stopped.
    Failed(io::Error),
}

/// Runs the terminal UI until the user quits.
pub async fn run_ui(client: Arc<dyn CompletionClient>) -> ChatResult<()> {
    enable_raw_mode()?;
    let res = match setup_terminal() {
        Ok(mut terminal) => {
            let (event_tx, event_rx) = mpsc::channel::<Event>(100);
            spawn_input_reader(event_tx);
            run_app(&mut terminal, App::new(), client, event_rx).await
        }
        Err(e) => Err(e),
    };
    with_restore(res, restore_terminal)
}

fn setup_terminal() -> ChatResult<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Leaves raw mode and the alternate screen, attempting every step.
fn restore_terminal() -> ChatResult<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, Show);
    raw.and(screen)?;
    Ok(())
}

/// Always runs `restore`. An error from `res` wins over one from `restore`.
fn with_restore<T>(res: ChatResult<T>, restore: impl FnOnce() -> ChatResult<()>) -> ChatResult<T> {
    let restored = restore();
    match (res, restored) {
        (Err(e), Err(restore_err)) => {
            log::error!("failed to restore terminal: {restore_err}");
            Err(e)
        }
        (res, restored) => restored.and(res),
    }
}

/// Main loop of the application.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    client: Arc<dyn CompletionClient>,
    mut event_rx: mpsc::Receiver<Event>,
) -> ChatResult<()> {
    let (reply_tx, mut reply_rx) = mpsc::channel::<ChatResult<String>>(1);

    loop {
        terminal.draw(|f| chat::draw_chat(f, &mut app))?;

        tokio::select! {
            next = event_rx.recv() => match next {
                Some(Event::Input(CEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    match handle_chat_input(key, &mut app) {
                        KeyAction::Quit => break,
                        KeyAction::Submit(history) => {
                            spawn_completion(client.clone(), history, reply_tx.clone())
                        }
                        KeyAction::None => {}
                    }
                }
                // Resizes and other input only need a redraw.
                Some(Event::Input(_)) => {}
                Some(Event::Tick) => app.status.update_spinner(),
                Some(Event::Failed(e)) => return Err(e.into()),
                None => {
                    return Err(ChatError::Io(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        "terminal input reader stopped",
                    )))
                }
            },
            Some(result) = reply_rx.recv() => app.finish_reply(result),
        }
    }

    Ok(())
}

/// Polls crossterm on a plain thread; the poll call blocks.
///
/// The thread ends once the main loop drops its receiver, or after
/// reporting a terminal error.
fn spawn_input_reader(tx: mpsc::Sender<Event>) {
    thread::spawn(move || {
        let tick_rate = Duration::from_millis(TICK_RATE_MS);
        loop {
            let next = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(input) => Event::Input(input),
                    Err(e) => {
                        log::error!("failed to read terminal event: {e}");
                        Event::Failed(e)
                    }
                },
                Ok(false) => Event::Tick,
                Err(e) => {
                    log::error!("failed to poll terminal events: {e}");
                    Event::Failed(e)
                }
            };
            let failed = matches!(next, Event::Failed(_));
            if tx.blocking_send(next).is_err() || failed {
                return;
            }
        }
    });
}

/// Runs one completion request off the UI loop and reports back.
fn spawn_completion(
    client: Arc<dyn CompletionClient>,
    history: Vec<Message>,
    reply_tx: mpsc::Sender<ChatResult<String>>,
) {
    tokio::spawn(async move {
        let result = client.request_completion(&history).await;
        if reply_tx.send(result).await.is_err() {
            log::debug!("completion finished after the UI closed");
        }
    });
}
