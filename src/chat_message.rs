// src/chat_message.rs

use crate::code_snippet::{CodeSnippet, SnippetManager};
use crate::constants::USER_INDENT;
use crate::markdown::render_markdown_numbered;
use crate::models::{Message, Sender};
use crate::utils::wrap_spans;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;

/// A message laid out for a given width.
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    pub lines: Vec<Line<'static>>,
    pub snippets: Vec<CodeSnippet>,
}

fn base_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Rgb(255, 223, 128)),
        Sender::Bot => Style::default().fg(Color::Rgb(220, 220, 220)),
    }
}

fn frame_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Rgb(255, 223, 128)),
        Sender::Bot => Style::default().fg(Color::Rgb(144, 238, 144)),
    }
}

/// Header, wrapped body, footer. User text is shown verbatim and bot text
/// as markdown, with copyable blocks numbered from `first_snippet`.
pub fn render_message(message: &Message, width: u16, first_snippet: usize) -> RenderedMessage {
    let sender = message.sender();
    let frame = frame_style(sender);
    let indent = if message.is_from_user() { USER_INDENT } else { "" };
    let body_width = (width as usize).saturating_sub(indent.len() + 2).max(1);

    let mut lines = Vec::new();
    let label = match sender {
        Sender::User => "You",
        Sender::Bot => "Assistant",
    };
    lines.push(Line::from(vec![
        Span::raw(indent.to_string()),
        Span::styled("┌─ ", frame),
        Span::styled(label, frame.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" · {}", message.sent_at().format("%H:%M")),
            frame.add_modifier(Modifier::DIM),
        ),
    ]));

    let (rows, snippets) = match sender {
        Sender::User => (user_rows(message.text(), body_width), Vec::new()),
        Sender::Bot => {
            let rendered =
                render_markdown_numbered(message.text(), base_style(sender), first_snippet);
            let rows = rendered
                .lines
                .into_iter()
                .flat_map(|line| wrap_spans(line.spans, body_width))
                .collect();
            (rows, rendered.snippets)
        }
    };

    for row in rows {
        let mut spans = vec![Span::raw(indent.to_string()), Span::styled("│ ", frame)];
        spans.extend(row);
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(vec![
        Span::raw(indent.to_string()),
        Span::styled("└─", frame),
    ]));

    RenderedMessage { lines, snippets }
}

fn user_rows(text: &str, width: usize) -> Vec<Vec<Span<'static>>> {
    let style = base_style(Sender::User);
    text.lines()
        .flat_map(|line| {
            if line.is_empty() {
                return vec![Vec::new()];
            }
            wrap(line, width)
                .into_iter()
                .map(|part| vec![Span::styled(part.into_owned(), style)])
                .collect()
        })
        .collect()
}

/// Rendered messages for the current width.
///
/// The conversation only grows, so entries for earlier messages stay valid
/// until the width changes. Copyable blocks are numbered across the whole
/// transcript, in order of appearance.
#[derive(Debug, Default)]
pub struct TranscriptCache {
    width: u16,
    rendered: Vec<RenderedMessage>,
}

impl TranscriptCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, messages: &[Message], width: u16) -> &[RenderedMessage] {
        if width != self.width || self.rendered.len() > messages.len() {
            self.rendered.clear();
            self.width = width;
        }
        let mut next_snippet = self.snippet_count() + 1;
        for message in &messages[self.rendered.len()..] {
            let rendered = render_message(message, width, next_snippet);
            next_snippet += rendered.snippets.len();
            self.rendered.push(rendered);
        }
        &self.rendered
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    fn snippet_count(&self) -> usize {
        self.rendered.iter().map(|m| m.snippets.len()).sum()
    }

    /// Every copyable block rendered so far.
    pub fn snippets(&self) -> SnippetManager {
        SnippetManager::new(
            self.rendered
                .iter()
                .flat_map(|m| m.snippets.iter().cloned())
                .collect(),
        )
    }

    /// All lines, one blank line between messages.
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for message in &self.rendered {
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(message.lines.iter().cloned());
        }
        lines
    }
}
