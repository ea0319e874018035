// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::widgets::{md_blockquote, md_bullet, md_rule_char};

/// A styled line ready for Ratatui rendering.
pub type StyledLines = Vec<Line<'static>>;

/// Style used for hyperlinks in message bodies and source lines.
pub(crate) fn link_style() -> Style {
    Style::default().fg(Color::LightBlue).add_modifier(Modifier::UNDERLINED)
}

/// Convert a markdown string into a list of styled [`Line`]s for Ratatui.
///
/// Links are drawn underlined.  When the link text differs from its target
/// the target follows in dimmed angle brackets, since terminals cannot hide
/// an href behind text.
///
/// `ascii`: when true, use plain ASCII characters instead of Unicode
/// box-drawing glyphs.
pub fn render_markdown(md: &str, wrap_width: u16, ascii: bool) -> StyledLines {
    let width = if wrap_width == 0 { 80 } else { wrap_width as usize };
    let mut lines: StyledLines = Vec::new();
    let mut current_spans: Vec<Span<'static>> = Vec::new();
    let mut style_stack: Vec<Style> = vec![Style::default()];
    // (target, visible text) of each link being rendered
    let mut link_stack: Vec<(String, String)> = Vec::new();

    let push_line = |lines: &mut StyledLines, spans: &mut Vec<Span<'static>>| {
        if spans.is_empty() {
            lines.push(Line::default());
        } else {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    let parser = Parser::new(md);
    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                push_line(&mut lines, &mut current_spans);
                style_stack.push(heading_style(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                style_stack.pop();
                push_line(&mut lines, &mut current_spans);
                lines.push(Line::default());
            }
            Event::Start(Tag::Strong) => {
                let base = *style_stack.last().unwrap_or(&Style::default());
                style_stack.push(base.add_modifier(Modifier::BOLD));
            }
            Event::End(TagEnd::Strong) => { style_stack.pop(); }
            Event::Start(Tag::Emphasis) => {
                let base = *style_stack.last().unwrap_or(&Style::default());
                style_stack.push(base.add_modifier(Modifier::ITALIC));
            }
            Event::End(TagEnd::Emphasis) => { style_stack.pop(); }
            Event::Start(Tag::Link { dest_url, .. }) => {
                let base = *style_stack.last().unwrap_or(&Style::default());
                style_stack.push(base.patch(link_style()));
                link_stack.push((dest_url.to_string(), String::new()));
            }
            Event::End(TagEnd::Link) => {
                style_stack.pop();
                if let Some((target, text)) = link_stack.pop() {
                    if text.trim() != target {
                        current_spans.push(Span::styled(
                            format!(" <{target}>"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                push_line(&mut lines, &mut current_spans);
                style_stack.push(Style::default().fg(Color::Cyan));
            }
            Event::End(TagEnd::CodeBlock) => {
                push_line(&mut lines, &mut current_spans);
                style_stack.pop();
                lines.push(Line::default());
            }
            Event::Start(Tag::List(_)) => {
                push_line(&mut lines, &mut current_spans);
            }
            Event::Start(Tag::Item) => {
                current_spans.push(Span::raw(format!("  {}", md_bullet(ascii))));
            }
            Event::End(TagEnd::Item) => {
                push_line(&mut lines, &mut current_spans);
            }
            Event::Start(Tag::BlockQuote(_)) => {
                let base = *style_stack.last().unwrap_or(&Style::default());
                style_stack.push(base.fg(Color::DarkGray));
                current_spans.push(Span::raw(md_blockquote(ascii).to_string()));
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                push_line(&mut lines, &mut current_spans);
                style_stack.pop();
                lines.push(Line::default());
            }
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                push_line(&mut lines, &mut current_spans);
                lines.push(Line::default());
            }
            Event::Text(t) | Event::Html(t) | Event::InlineHtml(t) => {
                if let Some((_, text)) = link_stack.last_mut() {
                    text.push_str(&t);
                }
                let style = *style_stack.last().unwrap_or(&Style::default());
                let mut col = current_col(&current_spans);
                let mut buf = String::new();
                for word in t.split_inclusive(' ') {
                    if col + word.width() > width && col > 0 {
                        if !buf.is_empty() {
                            current_spans.push(Span::styled(std::mem::take(&mut buf), style));
                        }
                        push_line(&mut lines, &mut current_spans);
                        col = 0;
                    }
                    // Words wider than the pane are broken mid-word.
                    let mut rest = word;
                    while col + rest.trim_end().width() > width {
                        let (head, tail) = split_at_width(rest, width - col);
                        if head.is_empty() {
                            break;
                        }
                        buf.push_str(head);
                        current_spans.push(Span::styled(std::mem::take(&mut buf), style));
                        push_line(&mut lines, &mut current_spans);
                        col = 0;
                        rest = tail;
                    }
                    buf.push_str(rest);
                    col += rest.width();
                }
                if !buf.is_empty() {
                    current_spans.push(Span::styled(buf, style));
                }
            }
            Event::Code(t) => {
                if let Some((_, text)) = link_stack.last_mut() {
                    text.push_str(&t);
                }
                let style = Style::default().fg(Color::Yellow).bg(Color::DarkGray);
                current_spans.push(Span::styled(format!("`{t}`"), style));
            }
            Event::SoftBreak => {
                current_spans.push(Span::raw(" "));
            }
            Event::HardBreak => {
                push_line(&mut lines, &mut current_spans);
            }
            Event::Rule => {
                push_line(&mut lines, &mut current_spans);
                lines.push(Line::from(Span::styled(
                    md_rule_char(ascii).to_string().repeat(width),
                    Style::default().fg(Color::DarkGray),
                )));
                lines.push(Line::default());
            }
            _ => {}
        }
    }

    if !current_spans.is_empty() {
        lines.push(Line::from(current_spans));
    }

    // Paragraph ends leave a spacer; the caller adds its own between turns.
    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.spans.is_empty()).count();
    lines.drain(..leading);

    lines.into_iter().flat_map(|l| fit_to_width(l, width)).collect()
}

/// Break `line` into lines no wider than `width` columns.
///
/// Spans are cut at character boundaries and keep their style; every piece
/// keeps the line's own style and alignment.  The chat pane draws one row
/// per line, so anything wider would be clipped.
pub(crate) fn fit_to_width(line: Line<'static>, width: usize) -> StyledLines {
    if width == 0 || line.width() <= width {
        return vec![line];
    }
    let (line_style, alignment) = (line.style, line.alignment);
    let finish = |spans: Vec<Span<'static>>| {
        let mut l = Line::from(spans);
        l.style = line_style;
        l.alignment = alignment;
        l
    };

    let mut out = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut col = 0;
    for span in line.spans {
        let mut rest: &str = span.content.as_ref();
        while col + rest.width() > width {
            let (mut head, mut tail) = split_at_width(rest, width - col);
            if head.is_empty() && col == 0 {
                // A single glyph wider than the pane gets a row of its own.
                let n = rest.chars().next().map_or(rest.len(), char::len_utf8);
                (head, tail) = rest.split_at(n);
            }
            if !head.is_empty() {
                current.push(Span::styled(head.to_string(), span.style));
            }
            out.push(finish(std::mem::take(&mut current)));
            col = 0;
            rest = tail;
        }
        if !rest.is_empty() {
            col += rest.width();
            current.push(Span::styled(rest.to_string(), span.style));
        }
    }
    if !current.is_empty() {
        out.push(finish(current));
    }
    out
}

/// Split `s` after the longest prefix that fits in `max` columns.
fn split_at_width(s: &str, max: usize) -> (&str, &str) {
    let mut used = 0;
    for (i, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            return s.split_at(i);
        }
        used += w;
    }
    (s, "")
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
        HeadingLevel::H2 => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        HeadingLevel::H3 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    }
}

fn current_col(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|s| s.content.width()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &StyledLines) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn plain_paragraph_is_one_line() {
        let lines = render_markdown("hello world", 80, false);
        assert_eq!(text_of(&lines), ["hello world"]);
    }

    #[test]
    fn long_text_wraps_at_width() {
        let lines = render_markdown("aaaa bbbb cccc dddd", 10, false);
        assert!(lines.len() >= 2);
        for l in text_of(&lines) {
            assert!(l.trim_end().width() <= 10, "line too wide: {l:?}");
        }
    }

    #[test]
    fn bold_text_carries_bold_modifier() {
        let lines = render_markdown("**loud**", 80, false);
        let span = lines[0].spans.iter().find(|s| s.content == "loud").unwrap();
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn named_link_shows_target_after_text() {
        let lines = render_markdown("see [the sheet](http://x/a.xlsx)", 80, false);
        let spans = &lines[0].spans;
        let text = spans.iter().find(|s| s.content == "the sheet").unwrap();
        assert!(text.style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(spans.iter().any(|s| s.content == " <http://x/a.xlsx>"));
    }

    #[test]
    fn bare_autolink_is_not_repeated() {
        let lines = render_markdown("<http://x/y>", 80, false);
        let joined = &text_of(&lines)[0];
        assert_eq!(joined.matches("http://x/y").count(), 1);
    }

    #[test]
    fn bullets_follow_ascii_flag() {
        let uni = text_of(&render_markdown("- a", 80, false));
        let asc = text_of(&render_markdown("- a", 80, true));
        assert!(uni.iter().any(|l| l == "  • a"));
        assert!(asc.iter().any(|l| l == "  - a"));
    }

    #[test]
    fn words_wider_than_the_pane_are_broken() {
        let lines = render_markdown("go http://example.com/aaaaaaaaaaaaaaaaaaaa now", 12, true);
        let text = text_of(&lines);
        for l in &text {
            assert!(l.width() <= 12, "line too wide: {l:?}");
        }
        assert_eq!(text.concat().replace(' ', ""), "gohttp://example.com/aaaaaaaaaaaaaaaaaaaanow");
    }

    #[test]
    fn link_targets_are_kept_within_width() {
        let lines = render_markdown("[sheet](http://example.com/a/very/long/path.xlsx)", 16, true);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width() <= 16));
        assert!(text_of(&lines).concat().contains("path.xlsx>"));
    }

    #[test]
    fn fitting_keeps_span_styles_and_alignment() {
        let line = Line::from(vec![
            Span::raw("abcdef"),
            Span::styled("ghijkl", link_style()),
        ])
        .alignment(ratatui::layout::Alignment::Right);
        let parts = fit_to_width(line, 4);
        assert_eq!(text_of(&parts), ["abcd", "efgh", "ijkl"]);
        assert!(parts.iter().all(|l| l.alignment == Some(ratatui::layout::Alignment::Right)));
        assert_eq!(parts[1].spans[1].style, link_style());
        assert_eq!(parts[2].spans[0].style, link_style());
    }

    #[test]
    fn trailing_blank_lines_are_trimmed() {
        let lines = render_markdown("one\n\ntwo\n", 80, false);
        assert_eq!(text_of(&lines), ["one", "", "two"]);
    }
}
