// src/status_indicator.rs

use crate::constants::NOTICE_TTL_MS;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    kind: NoticeKind,
    shown_at: Instant,
}

/// One-line status bar: a spinner while a reply is pending, plus short-lived
/// notices.
#[derive(Debug)]
pub struct StatusIndicator {
    thinking: bool,
    notice: Option<Notice>,
    spinner_idx: usize,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self {
            thinking: false,
            notice: None,
            spinner_idx: 0,
        }
    }

    pub fn set_thinking(&mut self, thinking: bool) {
        self.thinking = thinking;
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    pub fn notify(&mut self, text: impl Into<String>, kind: NoticeKind) {
        self.notice = Some(Notice {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
    }

    /// The live notice, if it has not expired.
    pub fn notice(&self) -> Option<(&str, NoticeKind)> {
        self.notice
            .as_ref()
            .filter(|n| n.shown_at.elapsed() < Duration::from_millis(NOTICE_TTL_MS))
            .map(|n| (n.text.as_str(), n.kind))
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let spinner_frames = ["◐", "◓", "◑", "◒"];
        let thinking_indicator = if self.thinking {
            spinner_frames[self.spinner_idx % spinner_frames.len()]
        } else {
            " "
        };

        let (status_text, status_color) = match self.notice() {
            Some((text, NoticeKind::Info)) => (text, Color::Yellow),
            Some((text, NoticeKind::Error)) => (text, Color::Red),
            None if self.thinking => ("Thinking...", Color::DarkGray),
            None => ("", Color::DarkGray),
        };

        let status = Line::from(vec![
            Span::styled(thinking_indicator, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]);

        frame.render_widget(Paragraph::new(status).alignment(Alignment::Left), area);
    }
}
