// src/key_handlers.rs

use crate::app::App;
use crate::chat::SubmitRejection;
use crate::constants::BUSY_NOTICE;
use crate::models::Message;
use crate::status_indicator::NoticeKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Quit,
    /// Send this history to the completion client.
    Submit(Vec<Message>),
}

pub fn handle_chat_input(key: KeyEvent, app: &mut App) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if app.copy_prompt.is_some() {
        return handle_copy_prompt(key, app);
    }

    match key.code {
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('c') if ctrl => return KeyAction::Quit,
        KeyCode::Enter => match app.session.begin_submit() {
            Ok(history) => {
                app.status.set_thinking(true);
                app.scroll.follow_bottom();
                return KeyAction::Submit(history);
            }
            Err(SubmitRejection::Busy) => app.status.notify(BUSY_NOTICE, NoticeKind::Info),
            Err(SubmitRejection::Blank) => {}
        },
        KeyCode::Char(c @ '1'..='9') if alt => {
            if let Some(number) = c.to_digit(10) {
                app.copy_snippet(number as usize);
            }
        }
        KeyCode::Char('y') if ctrl => app.copy_prompt = Some(String::new()),
        KeyCode::Char('u') if ctrl => app.scroll.page_up(),
        KeyCode::Char('d') if ctrl => app.scroll.page_down(),
        KeyCode::PageUp => app.scroll.page_up(),
        KeyCode::PageDown => app.scroll.page_down(),
        KeyCode::Up => app.scroll.scroll_up(1),
        KeyCode::Down => app.scroll.scroll_down(1),
        KeyCode::Backspace => app.session.pop_input(),
        KeyCode::Char(c) if !ctrl && !alt => app.session.push_input(c),
        _ => {}
    }
    KeyAction::None
}

/// Ctrl-Y prompt: digits pick a block, Enter copies, Esc cancels.
fn handle_copy_prompt(key: KeyEvent, app: &mut App) -> KeyAction {
    let Some(digits) = app.copy_prompt.as_mut() else {
        return KeyAction::None;
    };
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit
        }
        KeyCode::Char(c) if c.is_ascii_digit() => digits.push(c),
        KeyCode::Backspace => {
            digits.pop();
        }
        KeyCode::Esc => app.copy_prompt = None,
        KeyCode::Enter => {
            let digits = app.copy_prompt.take().unwrap_or_default();
            match digits.parse::<usize>() {
                Ok(number) => app.copy_snippet(number),
                Err(_) => app.status.notify("Type a block number to copy", NoticeKind::Error),
            }
        }
        _ => {}
    }
    KeyAction::None
}
