// src/app.rs

use crate::chat::ChatSession;
use crate::chat_message::TranscriptCache;
use crate::clipboard::Clipboard;
use crate::code_snippet::SnippetManager;
use crate::constants::COPIED_NOTICE;
use crate::errors::ChatResult;
use crate::status_indicator::{NoticeKind, StatusIndicator};

/// Vertical scroll position of the message pane.
///
/// While `follow` is set, the view sticks to the bottom as content grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
    max: usize,
    page: usize,
    follow: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            max: 0,
            page: 1,
            follow: true,
        }
    }
}

impl ScrollState {
    /// Records the content and viewport size and returns the top line to show.
    pub fn set_viewport(&mut self, total_lines: usize, height: usize) -> usize {
        self.max = total_lines.saturating_sub(height);
        self.page = height.max(1);
        if self.follow || self.offset >= self.max {
            self.offset = self.max;
            self.follow = true;
        }
        self.offset
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.follow = self.offset >= self.max;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.max);
        self.follow = self.offset >= self.max;
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page);
    }

    pub fn follow_bottom(&mut self) {
        self.follow = true;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }
}

/// Everything the terminal UI draws from.
pub struct App {
    pub session: ChatSession,
    pub status: StatusIndicator,
    pub scroll: ScrollState,
    pub transcript: TranscriptCache,
    /// Digits typed after Ctrl-Y, while choosing a block to copy.
    pub copy_prompt: Option<String>,
    clipboard: Clipboard,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> App {
        App {
            session: ChatSession::new(),
            status: StatusIndicator::new(),
            scroll: ScrollState::default(),
            transcript: TranscriptCache::new(),
            copy_prompt: None,
            clipboard: Clipboard::new(),
        }
    }

    /// Applies a finished completion and jumps back to the newest message.
    pub fn finish_reply(&mut self, result: ChatResult<String>) {
        self.session.complete_submit(result);
        self.status.set_thinking(self.session.is_sending());
        self.scroll.follow_bottom();
    }

    /// Every copyable block in the transcript, numbered as labelled on screen.
    pub fn snippets(&mut self) -> SnippetManager {
        let width = self.transcript.width();
        self.transcript.sync(self.session.snapshot(), width);
        self.transcript.snippets()
    }

    /// Copies the block labelled `[copy number]`.
    pub fn copy_snippet(&mut self, number: usize) {
        let snippets = self.snippets();
        if snippets.is_empty() {
            self.status.notify("No code blocks to copy yet", NoticeKind::Error);
            return;
        }
        let Some(snippet) = snippets.get(number) else {
            self.status.notify(
                format!("No code block {number} to copy (1-{})", snippets.len()),
                NoticeKind::Error,
            );
            return;
        };

        match self.clipboard.copy(&snippet.content) {
            Ok(()) => {
                log::debug!("copied {} block {} to clipboard", snippet.language, number);
                self.status.notify(COPIED_NOTICE, NoticeKind::Info);
            }
            Err(e) => {
                log::error!("{e}");
                self.status.notify(e.to_string(), NoticeKind::Error);
            }
        }
    }
}
