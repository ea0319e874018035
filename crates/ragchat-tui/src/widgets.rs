// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::markdown::StyledLines;

// ── Character sets ────────────────────────────────────────────────────────────

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_ASCII: [&str; 4] = ["|", "/", "-", "\\"];

fn sep(ascii: bool) -> &'static str {
    if ascii { "|" } else { "│" }
}
pub(crate) fn spinner_frame(tick: usize, ascii: bool) -> &'static str {
    if ascii {
        SPINNER_ASCII[tick % SPINNER_ASCII.len()]
    } else {
        SPINNER[tick % SPINNER.len()]
    }
}
fn rule_char(ascii: bool) -> char {
    if ascii { '-' } else { '─' }
}
fn blockquote_prefix(ascii: bool) -> &'static str {
    if ascii { "> " } else { "▌ " }
}
fn bullet(ascii: bool) -> &'static str {
    if ascii { "- " } else { "• " }
}
fn border_type(ascii: bool) -> BorderType {
    if ascii { BorderType::Plain } else { BorderType::Rounded }
}

// ── Draw functions ────────────────────────────────────────────────────────────

/// Draw the status bar at the top.
pub fn draw_status(
    frame: &mut Frame,
    area: Rect,
    endpoint: &str,
    busy: bool,
    tick: usize,
    turns: usize,
    ascii: bool,
) {
    let busy_indicator = if busy { spinner_frame(tick, ascii) } else { " " };
    let separator = sep(ascii);

    let line = Line::from(vec![
        Span::styled(
            format!(" {busy_indicator} "),
            Style::default().fg(if busy { Color::Yellow } else { Color::DarkGray }),
        ),
        Span::styled(format!(" {endpoint} "), Style::default().fg(Color::LightCyan)),
        Span::styled(separator, Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" turns:{turns} "), Style::default().fg(Color::Green)),
        Span::styled(
            "  F1:help  ^w k:↑chat  ^w j:↓input  Enter:send  ^c:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}

/// Draw the chat scroll pane.
///
/// `lines` must already fit the pane width: each one takes exactly one row,
/// which keeps `scroll_offset` in step with what is on screen.
pub fn draw_chat(
    frame: &mut Frame,
    area: Rect,
    lines: &StyledLines,
    scroll_offset: u16,
    focused: bool,
    ascii: bool,
) {
    let block = pane_block("Chat", focused, ascii);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible: Vec<Line<'static>> = lines
        .iter()
        .skip(scroll_offset as usize)
        .take(inner.height as usize)
        .cloned()
        .collect();

    frame.render_widget(Paragraph::new(visible), inner);
}

/// Draw the single-line input box at the bottom.
///
/// While `busy` the box is dimmed and shows no cursor: the buffer cannot be
/// edited until the outstanding query completes.
#[allow(clippy::too_many_arguments)]
pub fn draw_input(
    frame: &mut Frame,
    area: Rect,
    content: &str,
    cursor_pos: usize,
    focused: bool,
    busy: bool,
    tick: usize,
    ascii: bool,
) {
    let title = if busy {
        format!("Input  [{} waiting for response]", spinner_frame(tick, ascii))
    } else {
        "Input  [Enter:send  ^w k:↑chat]".to_string()
    };

    let block = pane_block(&title, focused && !busy, ascii);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Keep the cursor in view by scrolling the line horizontally.
    let width = inner.width as usize;
    let before_cursor = content.get(..cursor_pos).unwrap_or(content).width();
    let h_scroll = before_cursor.saturating_sub(width.saturating_sub(1));

    let style = if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let para = Paragraph::new(Line::from(Span::styled(content.to_string(), style)))
        .scroll((0, h_scroll as u16));
    frame.render_widget(para, inner);

    if focused && !busy && inner.width > 0 {
        let col = (before_cursor - h_scroll) as u16;
        frame.set_cursor_position((inner.x + col, inner.y));
    }
}

/// Draw the help overlay.
pub fn draw_help(frame: &mut Frame, ascii: bool) {
    let area = frame.area();
    let bt = border_type(ascii);

    let help_text = vec![
        Line::from(Span::styled(
            "  Key Bindings",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::LightBlue),
        )),
        Line::default(),
        Line::from(" ^w k     Focus chat pane"),
        Line::from(" ^w j     Focus input pane"),
        Line::from(" j/k      Scroll chat down/up"),
        Line::from(" PgUp/Dn  Page up/down"),
        Line::from(" g / G    Jump to top/bottom"),
        Line::from(" Enter    Send the question"),
        Line::from(" ^←/^→    Move by word"),
        Line::from(" ^u / ^k  Delete to start/end of line"),
        Line::from(" ^c / ^q  Quit"),
        Line::from(" F1       Toggle this help"),
        Line::default(),
        Line::from(Span::styled(
            " Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let width = 48u16.min(area.width);
    let height = (help_text.len() as u16 + 2).min(area.height);
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let overlay = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(bt)
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);
    frame.render_widget(Paragraph::new(help_text), inner);
}

// ── Internal helpers ──────────────────────────────────────────────────────────

pub(crate) fn pane_block(title: &str, focused: bool, ascii: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::LightBlue)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            if focused {
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::LightBlue)
            } else {
                Style::default().fg(Color::Gray)
            },
        ))
        .borders(Borders::ALL)
        .border_type(border_type(ascii))
        .border_style(border_style)
}

pub(crate) fn md_rule_char(ascii: bool) -> char { rule_char(ascii) }
pub(crate) fn md_blockquote(ascii: bool) -> &'static str { blockquote_prefix(ascii) }
pub(crate) fn md_bullet(ascii: bool) -> &'static str { bullet(ascii) }

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn spinner_cycles_through_frames() {
        assert_ne!(spinner_frame(0, false), spinner_frame(1, false));
        assert_eq!(spinner_frame(0, true), spinner_frame(4, true));
    }

    #[test]
    fn status_bar_shows_endpoint_and_turn_count() {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal
            .draw(|f| draw_status(f, f.area(), "http://rag/chat", false, 0, 3, true))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("http://rag/chat"));
        assert!(text.contains("turns:3"));
    }

    #[test]
    fn busy_input_shows_waiting_title() {
        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        terminal
            .draw(|f| draw_input(f, f.area(), "draft", 5, true, true, 0, true))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("waiting for response"));
        assert!(text.contains("draft"));
    }

    #[test]
    fn chat_pane_respects_scroll_offset() {
        let lines: StyledLines = (0..10).map(|i| Line::from(format!("row{i}"))).collect();
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal
            .draw(|f| draw_chat(f, f.area(), &lines, 4, false, true))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(!text.contains("row3"));
        assert!(text.contains("row4"));
        assert!(text.contains("row6"));
        assert!(!text.contains("row7"));
    }
}
