// src/markdown.rs

//! Markdown to styled terminal lines, with syntax-highlighted code blocks.

use crate::code_snippet::CodeSnippet;
use crate::constants::HIGHLIGHT_THEME;
use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME: Lazy<Option<Theme>> =
    Lazy::new(|| ThemeSet::load_defaults().themes.remove(HIGHLIGHT_THEME));

const RULE_WIDTH: usize = 24;

/// Output of [`render_markdown`].
#[derive(Debug, Default)]
pub struct RenderedMarkdown {
    pub lines: Vec<Line<'static>>,
    /// Language-tagged code blocks in order of appearance.
    pub snippets: Vec<CodeSnippet>,
}

/// One entry per open tag, so every `End` event pops exactly one frame.
enum Frame {
    Paragraph,
    Heading,
    Quote,
    List,
    Item,
    CodeBlock,
    Styled,
    Other,
}

struct CodeBlockState {
    language: Option<String>,
    buffer: String,
}

struct Renderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    frames: Vec<Frame>,
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    pending_bullet: Option<String>,
    code: Option<CodeBlockState>,
    first_snippet: usize,
    snippets: Vec<CodeSnippet>,
}

pub fn code_style() -> Style {
    Style::default()
        .fg(Color::Rgb(209, 154, 102))
        .bg(Color::Rgb(40, 44, 52))
}

fn label_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Renders `source` as terminal lines using `base` for plain text.
pub fn render_markdown(source: &str, base: Style) -> RenderedMarkdown {
    render_markdown_numbered(source, base, 1)
}

/// Like [`render_markdown`], but the first copyable block gets `first_snippet`.
pub fn render_markdown_numbered(
    source: &str,
    base: Style,
    first_snippet: usize,
) -> RenderedMarkdown {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut renderer = Renderer::new(base, first_snippet);
    for event in Parser::new_ext(source, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

impl Renderer {
    fn new(base: Style, first_snippet: usize) -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            styles: vec![base],
            frames: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            pending_bullet: None,
            code: None,
            first_snippet,
            snippets: Vec::new(),
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.on_text(&text),
            Event::Code(text) => self.push_text(&text, code_style()),
            Event::SoftBreak => self.on_text(" "),
            Event::HardBreak => self.flush_line(true),
            Event::Rule => {
                self.flush_line(false);
                self.lines
                    .push(Line::from(Span::styled("─".repeat(RULE_WIDTH), label_style())));
                self.blank_line();
            }
            Event::TaskListMarker(done) => self.on_text(if done { "[x] " } else { "[ ] " }),
            Event::Html(text) | Event::InlineHtml(text) => {
                self.on_text(text.trim_end_matches('\n'))
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph,
            Tag::Heading { level, .. } => {
                self.flush_line(false);
                let mut style = Style::default().add_modifier(Modifier::BOLD);
                if level as u8 <= 2 {
                    style = style.fg(Color::Cyan);
                }
                self.push_style(style);
                Frame::Heading
            }
            Tag::BlockQuote(_) => {
                self.flush_line(false);
                self.quote_depth += 1;
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
                Frame::Quote
            }
            Tag::CodeBlock(kind) => {
                self.flush_line(false);
                let language = match kind {
                    CodeBlockKind::Fenced(info) => CodeSnippet::detect_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBlockState {
                    language,
                    buffer: String::new(),
                });
                Frame::CodeBlock
            }
            Tag::List(start) => {
                self.flush_line(false);
                self.lists.push(start);
                Frame::List
            }
            Tag::Item => {
                self.flush_line(false);
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let bullet = format!("{n}. ");
                        *n += 1;
                        bullet
                    }
                    _ => "• ".to_string(),
                };
                self.pending_bullet = Some(bullet);
                Frame::Item
            }
            Tag::Emphasis => {
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
                Frame::Styled
            }
            Tag::Strong => {
                self.push_style(Style::default().add_modifier(Modifier::BOLD));
                Frame::Styled
            }
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT));
                Frame::Styled
            }
            Tag::Link { .. } => {
                self.push_style(
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::UNDERLINED),
                );
                Frame::Styled
            }
            _ => Frame::Other,
        };
        self.frames.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        match frame {
            Frame::Paragraph => {
                self.flush_line(false);
                self.blank_line();
            }
            Frame::Heading => {
                self.pop_style();
                self.flush_line(false);
                self.blank_line();
            }
            Frame::Quote => {
                self.pop_style();
                self.flush_line(false);
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank_line();
            }
            Frame::CodeBlock => {
                if let Some(state) = self.code.take() {
                    self.finish_code_block(state);
                }
                self.blank_line();
            }
            Frame::List => {
                self.flush_line(false);
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Frame::Item => self.flush_line(false),
            Frame::Styled => self.pop_style(),
            Frame::Other => {}
        }
    }

    fn on_text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.buffer.push_str(text);
            return;
        }
        let style = self.style();
        self.push_text(text, style);
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if !text.is_empty() {
            self.current.push(Span::styled(text.to_string(), style));
        }
    }

    /// Quote bars plus list indentation or the pending bullet.
    fn prefix(&mut self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        if self.quote_depth > 0 {
            spans.push(Span::styled("│ ".repeat(self.quote_depth), label_style()));
        }
        let depth = self.lists.len();
        if depth > 0 {
            let indent = "  ".repeat(depth - 1);
            match self.pending_bullet.take() {
                Some(bullet) => spans.push(Span::styled(
                    format!("{indent}{bullet}"),
                    Style::default().fg(Color::Yellow),
                )),
                None => spans.push(Span::raw(format!("{indent}  "))),
            }
        }
        spans
    }

    /// Emits the current line. `force` emits it even when empty.
    fn flush_line(&mut self, force: bool) {
        if self.current.is_empty() && !force {
            return;
        }
        let mut spans = self.prefix();
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn finish_code_block(&mut self, state: CodeBlockState) {
        let content = CodeSnippet::clean(&state.buffer);
        match state.language {
            Some(language) => {
                let number = self.first_snippet + self.snippets.len();
                let mut label = self.prefix();
                label.push(Span::styled(format!("┌ {language} "), label_style()));
                label.push(Span::styled(
                    format!("[copy {number}]"),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                ));
                self.lines.push(Line::from(label));

                for spans in highlight_code(&content, &language) {
                    let mut line = self.prefix();
                    line.push(Span::styled("│ ", label_style()));
                    line.extend(spans);
                    self.lines.push(Line::from(line));
                }
                self.snippets
                    .push(CodeSnippet::new(number, language, content));
            }
            None => {
                for code_line in content.lines() {
                    let mut line = self.prefix();
                    line.push(Span::styled(format!("  {code_line}"), code_style()));
                    self.lines.push(Line::from(line));
                }
            }
        }
    }

    fn finish(mut self) -> RenderedMarkdown {
        self.flush_line(false);
        if let Some(state) = self.code.take() {
            self.finish_code_block(state);
        }
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        RenderedMarkdown {
            lines: self.lines,
            snippets: self.snippets,
        }
    }
}

/// Highlights `code` as `language`, one span list per line.
///
/// Unknown languages fall back to plain text. If the theme is missing, or a
/// line fails to highlight, the flat code style is used instead.
pub fn highlight_code(code: &str, language: &str) -> Vec<Vec<Span<'static>>> {
    let Some(theme) = THEME.as_ref() else {
        return plain_code(code);
    };
    let syntax = SYNTAX_SET
        .find_syntax_by_token(language)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut out = Vec::new();
    for line in LinesWithEndings::from(code) {
        match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => out.push(
                ranges
                    .into_iter()
                    .map(|(style, text)| (style, text.trim_end_matches('\n')))
                    .filter(|(_, text)| !text.is_empty())
                    .map(|(style, text)| {
                        let fg = style.foreground;
                        let color = Color::Rgb(fg.r, fg.g, fg.b);
                        Span::styled(text.to_string(), Style::default().fg(color))
                    })
                    .collect(),
            ),
            Err(e) => {
                log::debug!("highlighting {language} failed: {e}");
                out.push(vec![Span::styled(
                    line.trim_end_matches('\n').to_string(),
                    code_style(),
                )]);
            }
        }
    }
    out
}

fn plain_code(code: &str) -> Vec<Vec<Span<'static>>> {
    code.lines()
        .map(|line| vec![Span::styled(line.to_string(), code_style())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::normalize_reply;

    fn texts(rendered: &RenderedMarkdown) -> Vec<String> {
        rendered
            .lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn paragraphs_are_separated_by_one_blank_line() {
        let rendered = render_markdown("first\n\nsecond", Style::default());
        assert_eq!(texts(&rendered), ["first", "", "second"]);
    }

    #[test]
    fn hard_breaks_split_lines_and_soft_breaks_join() {
        let hard = render_markdown(&normalize_reply("one\ntwo"), Style::default());
        assert_eq!(texts(&hard), ["one", "two"]);

        let soft = render_markdown("one\ntwo", Style::default());
        assert_eq!(texts(&soft), ["one two"]);
    }

    #[test]
    fn tagged_code_block_becomes_a_snippet() {
        let source = normalize_reply(
            "Try this:\n\n```rust\nfn main() {\n    println!(\"hi\");\n}\n```\nDone.",
        );
        let rendered = render_markdown(&source, Style::default());

        assert_eq!(rendered.snippets.len(), 1);
        let snippet = &rendered.snippets[0];
        assert_eq!(snippet.number, 1);
        assert_eq!(snippet.language, "rust");
        assert_eq!(snippet.content, "fn main() {\n    println!(\"hi\");\n}");

        let lines = texts(&rendered);
        assert!(lines.iter().any(|l| l.contains("[copy 1]")));
        assert!(lines.iter().any(|l| l.contains("println!(\"hi\");")));
        assert_eq!(lines.last().map(String::as_str), Some("Done."));
    }

    #[test]
    fn untagged_blocks_and_inline_code_are_not_copyable() {
        let rendered = render_markdown("use `cargo`\n\n```\nplain\n```", Style::default());
        assert!(rendered.snippets.is_empty());
        let lines = texts(&rendered);
        assert_eq!(lines[0], "use cargo");
        assert!(lines.iter().any(|l| l.contains("plain")));
    }

    #[test]
    fn snippets_are_numbered_in_order() {
        let source = "```sh\nls\n```\n\ntext\n\n```python\nprint(1)\n```";
        let rendered = render_markdown(source, Style::default());
        let numbered: Vec<(usize, &str)> = rendered
            .snippets
            .iter()
            .map(|s| (s.number, s.language.as_str()))
            .collect();
        assert_eq!(numbered, [(1, "sh"), (2, "python")]);
    }

    #[test]
    fn numbering_can_continue_from_earlier_messages() {
        let source = "```sh\nls\n```\n\n```python\nprint(1)\n```";
        let rendered = render_markdown_numbered(source, Style::default(), 4);
        let numbers: Vec<usize> = rendered.snippets.iter().map(|s| s.number).collect();
        assert_eq!(numbers, [4, 5]);
        let lines = texts(&rendered);
        assert!(lines.iter().any(|l| l.ends_with("[copy 4]")));
        assert!(lines.iter().any(|l| l.ends_with("[copy 5]")));
    }

    #[test]
    fn lists_get_bullets_and_numbers() {
        let rendered = render_markdown("- a\n- b\n\n1. x\n2. y", Style::default());
        assert_eq!(texts(&rendered), ["• a", "• b", "", "1. x", "2. y"]);
    }

    #[test]
    fn unknown_language_still_highlights_as_plain_text() {
        let lines = highlight_code("some words\nmore", "definitely-not-a-language");
        assert_eq!(lines.len(), 2);
        let first: String = lines[0].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, "some words");
    }
}
