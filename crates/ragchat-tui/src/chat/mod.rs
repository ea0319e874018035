// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Terminal rendering of chat turns.
//!
//! User turns are left-aligned, bot turns right-aligned on a tinted
//! background.  A bot turn with citations ends in a `Sources:` block where
//! every source is its own link span and every `", "` separator its own
//! plain span, broken across as many lines as the pane width needs.

use ragchat_core::{ChatTurn, Sender, Transcript};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::markdown::{fit_to_width, link_style, render_markdown, StyledLines};

const BOT_BG: Color = Color::Rgb(0x46, 0x44, 0x54);
const SOURCES_LABEL: &str = "Sources: ";
const SEPARATOR: &str = ", ";

fn header(sender: Sender, ascii: bool) -> Line<'static> {
    let text = match (sender, ascii) {
        (Sender::User, false) => "👤 You",
        (Sender::User, true) => "[you]",
        (Sender::Bot, false) => "Assistant 🤖",
        (Sender::Bot, true) => "[bot]",
    };
    let color = if sender.is_bot() { Color::LightMagenta } else { Color::LightGreen };
    Line::from(Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)))
}

/// The inline citation block `Sources: a, b, c`, wrapped at `width`.
///
/// Lines break between a separator and the next source, never inside one
/// unless the source alone is wider than the pane.
pub fn sources_lines(sources: &[String], width: u16) -> StyledLines {
    let width = if width == 0 { 80 } else { width as usize };
    let mut lines = Vec::new();
    let mut spans = vec![Span::styled(SOURCES_LABEL, Style::default().fg(Color::Gray))];
    let mut col = SOURCES_LABEL.width();

    for (i, source) in sources.iter().enumerate() {
        let sep = if i + 1 < sources.len() { SEPARATOR } else { "" };
        let need = source.width() + sep.width();
        if col + need > width && col > 0 {
            lines.push(Line::from(std::mem::take(&mut spans)));
            col = 0;
        }
        spans.push(Span::styled(source.clone(), link_style()));
        if !sep.is_empty() {
            spans.push(Span::raw(sep));
        }
        col += need;
    }
    lines.push(Line::from(spans));

    lines.into_iter().flat_map(|l| fit_to_width(l, width)).collect()
}

/// Render one turn: icon header, markdown body, optional sources line and a
/// trailing blank spacer.
pub fn render_turn_lines(turn: &ChatTurn, width: u16, ascii: bool) -> StyledLines {
    let mut lines = vec![header(turn.sender, ascii)];
    lines.extend(render_markdown(&turn.content, width, ascii));
    let sources = turn.citations();
    if !sources.is_empty() {
        lines.extend(sources_lines(sources, width));
    }

    if turn.sender.is_bot() {
        lines = lines
            .into_iter()
            .map(|l| l.alignment(Alignment::Right).patch_style(Style::default().bg(BOT_BG)))
            .collect();
    } else {
        lines = lines.into_iter().map(|l| l.alignment(Alignment::Left)).collect();
    }
    lines.push(Line::default());
    lines
}

/// Render every turn of `transcript` in order.
pub fn render_transcript_lines(transcript: &Transcript, width: u16, ascii: bool) -> StyledLines {
    transcript
        .iter()
        .flat_map(|turn| render_turn_lines(turn, width, ascii))
        .collect()
}

#[cfg(test)]
mod tests {
    use ragchat_client::ChatAnswer;

    use super::*;

    fn bot(content: &str, sources: &[&str]) -> ChatTurn {
        ChatTurn::bot(ChatAnswer::new(content, sources.iter().map(|s| s.to_string()).collect()))
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn spans_of(lines: &StyledLines) -> Vec<&Span<'static>> {
        lines.iter().flat_map(|l| l.spans.iter()).collect()
    }

    #[test]
    fn three_sources_make_three_links_and_two_separators() {
        let lines = sources_lines(&["a".into(), "b".into(), "c".into()], 80);
        assert_eq!(lines.len(), 1);
        let spans = spans_of(&lines);
        let links: Vec<&str> = spans
            .iter()
            .filter(|s| s.style.add_modifier.contains(Modifier::UNDERLINED))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(links, ["a", "b", "c"]);
        assert_eq!(spans.iter().filter(|s| s.content == ", ").count(), 2);
        assert_eq!(plain(&lines[0]), "Sources: a, b, c");
    }

    #[test]
    fn single_source_has_no_separator() {
        let lines = sources_lines(&["only".into()], 80);
        assert_eq!(plain(&lines[0]), "Sources: only");
        assert!(!spans_of(&lines).iter().any(|s| s.content == ", "));
    }

    #[test]
    fn long_source_list_wraps_between_links() {
        let sources: Vec<String> = ["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc"]
            .iter()
            .map(|s| format!("http://example.com/{s}"))
            .collect();
        let lines = sources_lines(&sources, 48);
        let text: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(
            text,
            [
                "Sources: http://example.com/aaaaaaaaaa, ",
                "http://example.com/bbbbbbbbbb, ",
                "http://example.com/cccccccccc",
            ]
        );
        let spans = spans_of(&lines);
        let links: Vec<&str> = spans
            .iter()
            .filter(|s| s.style == link_style())
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(links, sources);
        assert_eq!(spans.iter().filter(|s| s.content == ", ").count(), 2);
    }

    #[test]
    fn source_wider_than_the_pane_is_split_not_dropped() {
        let lines = sources_lines(&["http://example.com/zzzzzzzzzz".into()], 20);
        assert!(lines.iter().all(|l| l.width() <= 20));
        let joined: String = lines.iter().map(plain).collect();
        assert_eq!(joined, "Sources: http://example.com/zzzzzzzzzz");
    }

    #[test]
    fn bot_turn_is_right_aligned_with_sources_last() {
        let lines = render_turn_lines(&bot("hello", &["http://x"]), 80, true);
        assert_eq!(plain(&lines[0]), "[bot]");
        assert_eq!(plain(&lines[1]), "hello");
        assert_eq!(plain(&lines[2]), "Sources: http://x");
        assert!(plain(&lines[3]).is_empty());
        for l in &lines[..3] {
            assert_eq!(l.alignment, Some(Alignment::Right));
            assert_eq!(l.style.bg, Some(BOT_BG));
        }
    }

    #[test]
    fn bot_turn_without_sources_has_no_sources_line() {
        let lines = render_turn_lines(&bot("hello", &[]), 80, true);
        assert!(!lines.iter().any(|l| plain(l).starts_with("Sources:")));
    }

    #[test]
    fn user_turn_is_left_aligned_and_never_lists_sources() {
        let mut turn = ChatTurn::user("question");
        turn.sources.push("http://ignored".into());
        let lines = render_turn_lines(&turn, 80, true);
        assert_eq!(plain(&lines[0]), "[you]");
        assert_eq!(lines[0].alignment, Some(Alignment::Left));
        assert!(!lines.iter().any(|l| plain(l).contains("ignored")));
    }

    #[test]
    fn transcript_lines_keep_turn_order() {
        let t = Transcript::with_demo();
        let lines = render_transcript_lines(&t, 80, true);
        let you = lines.iter().position(|l| plain(l) == "[you]").unwrap();
        let bot = lines.iter().position(|l| plain(l) == "[bot]").unwrap();
        assert!(you < bot);
        assert!(lines
            .iter()
            .any(|l| plain(l) == "Sources: https://intern.regent.se/en/staff-car/"));
    }
}
