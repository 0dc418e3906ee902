// src/utils.rs

use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

/// Splits styled spans into rows no wider than `width` terminal cells.
///
/// Breaks fall between characters, so styles survive the split. An empty
/// input yields a single empty row.
pub fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for span in spans {
        let style = span.style;
        let mut chunk = String::new();
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width && used > 0 {
                if !chunk.is_empty() {
                    row.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            chunk.push(ch);
            used += w;
        }
        if !chunk.is_empty() {
            row.push(Span::styled(chunk, style));
        }
    }
    rows.push(row);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Style};

    fn row_text(row: &[Span<'_>]) -> String {
        row.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn short_line_is_one_row() {
        let rows = wrap_spans(vec![Span::raw("hello")], 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(row_text(&rows[0]), "hello");
    }

    #[test]
    fn long_line_breaks_across_spans_and_keeps_styles() {
        let red = Style::default().fg(Color::Red);
        let rows = wrap_spans(vec![Span::raw("abcd"), Span::styled("efgh", red)], 3);
        let texts: Vec<String> = rows.iter().map(|r| row_text(r)).collect();
        assert_eq!(texts, ["abc", "def", "gh"]);
        assert_eq!(rows[1][1].style, red);
    }

    #[test]
    fn wide_characters_count_double() {
        let rows = wrap_spans(vec![Span::raw("日本語")], 4);
        let texts: Vec<String> = rows.iter().map(|r| row_text(r)).collect();
        assert_eq!(texts, ["日本", "語"]);
    }

    #[test]
    fn empty_input_is_one_empty_row() {
        let rows = wrap_spans(Vec::new(), 5);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_empty());
    }
}
