// src/ui/chat.rs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::constants::INPUT_PLACEHOLDER;

pub fn draw_chat(f: &mut Frame<'_>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Min(1),    // Messages
                Constraint::Length(1), // Status
                Constraint::Length(3), // Input
            ]
            .as_ref(),
        )
        .split(f.area());

    draw_messages(f, app, chunks[0]);
    app.status.render(f, chunks[1]);
    draw_input(f, app, chunks[2]);
}

fn draw_messages(f: &mut Frame<'_>, app: &mut App, area: Rect) {
    app.transcript.sync(app.session.snapshot(), area.width);
    let lines = app.transcript.lines();

    let height = area.height as usize;
    let offset = app.scroll.set_viewport(lines.len(), height);
    let visible: Vec<Line<'static>> = lines.into_iter().skip(offset).take(height).collect();

    f.render_widget(Paragraph::new(visible), area);
}

fn draw_input(f: &mut Frame<'_>, app: &App, area: Rect) {
    if let Some(digits) = app.copy_prompt.as_deref() {
        draw_copy_prompt(f, digits, area);
        return;
    }

    let input = app.session.pending_input();
    let sending = app.session.is_sending();

    let border_color = if sending { Color::DarkGray } else { Color::Gray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message ")
        .title_bottom(
            Line::from(" Enter send · Alt+N / Ctrl+Y copy code · Esc quit ").right_aligned(),
        );

    let inner_width = area.width.saturating_sub(2) as usize;
    let text_width = input.width();
    // Keep the cursor in view by showing the tail of long input.
    let scroll_offset = text_width.saturating_sub(inner_width.saturating_sub(1));

    let line = if input.is_empty() {
        Line::from(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(input, Style::default().fg(Color::White)))
    };

    f.render_widget(
        Paragraph::new(line)
            .block(block)
            .scroll((0, scroll_offset as u16)),
        area,
    );

    let cursor_x = area.x + 1 + (text_width - scroll_offset) as u16;
    f.set_cursor_position((cursor_x, area.y + 1));
}

fn draw_copy_prompt(f: &mut Frame<'_>, digits: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Copy code block ")
        .title_bottom(Line::from(" Enter copy · Esc cancel ").right_aligned());

    let label = "Block number: ";
    let line = Line::from(vec![
        Span::styled(label, Style::default().fg(Color::DarkGray)),
        Span::styled(digits, Style::default().fg(Color::White)),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);

    let cursor_x = area.x + 1 + (label.width() + digits.width()) as u16;
    f.set_cursor_position((cursor_x, area.y + 1));
}
