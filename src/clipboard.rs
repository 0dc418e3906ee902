// src/clipboard.rs

use crate::errors::{ChatError, ChatResult};
use copypasta::{ClipboardContext, ClipboardProvider};

/// System clipboard, opened on first use.
///
/// The context is kept for the session, because on X11 the copied text is
/// only served while it is alive.
#[derive(Default)]
pub struct Clipboard {
    ctx: Option<ClipboardContext>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, text: &str) -> ChatResult<()> {
        if self.ctx.is_none() {
            let ctx = ClipboardContext::new().map_err(|e| {
                ChatError::clipboard_error(format!("Failed to open clipboard: {e}"))
            })?;
            self.ctx = Some(ctx);
        }

        match self.ctx.as_mut() {
            Some(ctx) => ctx
                .set_contents(text.to_string())
                .map_err(|e| ChatError::clipboard_error(format!("Failed to copy: {e}"))),
            None => Err(ChatError::clipboard_error("Clipboard unavailable")),
        }
    }
}
