// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! HTML rendering of chat turns.
//!
//! Message bodies are markdown rendered with pulldown-cmark.  Raw HTML in a
//! body is escaped, and every link is routed through a [`LinkPolicy`]
//! instead of pulldown-cmark's default anchor.  Bot turns with citations get
//! an inline, comma-separated source line.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::transcript::{ChatTurn, Sender, Transcript};

/// How hyperlinks are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    /// Add `target="_blank"`.
    pub new_tab: bool,
    /// Value of the `rel` attribute; empty omits it.
    pub rel: String,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self { new_tab: true, rel: "noopener noreferrer".into() }
    }
}

impl LinkPolicy {
    /// Opening `<a>` tag for `href`, or `None` when the scheme is not one we
    /// are willing to link to (the link text is then rendered as plain text).
    pub fn open_tag(&self, href: &str, title: &str) -> Option<String> {
        if !is_safe_href(href) {
            return None;
        }
        let mut tag = format!(r#"<a href="{}""#, escape_html(href));
        if !title.is_empty() {
            tag.push_str(&format!(r#" title="{}""#, escape_html(title)));
        }
        if self.new_tab {
            tag.push_str(r#" target="_blank""#);
        }
        if !self.rel.is_empty() {
            tag.push_str(&format!(r#" rel="{}""#, escape_html(&self.rel)));
        }
        tag.push('>');
        Some(tag)
    }

    /// A complete anchor whose text is the URL itself.
    pub fn anchor(&self, href: &str) -> String {
        match self.open_tag(href, "") {
            Some(open) => format!("{open}{}</a>", escape_html(href)),
            None => escape_html(href),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub link_policy: LinkPolicy,
}

/// Render one turn as an HTML fragment.
pub fn render_turn(turn: &ChatTurn, opts: &RenderOptions) -> String {
    let is_bot = turn.sender.is_bot();
    let class = if is_bot { "message-bot" } else { "message-user" };

    let mut body = render_markdown(&turn.content, &opts.link_policy);
    let sources = turn.citations();
    if !sources.is_empty() {
        body.push_str(&render_sources(sources, &opts.link_policy));
    }
    let body = format!(r#"<div class="message-body">{body}</div>"#);
    let icon = icon_html(turn.sender);

    // Bot bubbles put the icon after the content.
    let (first, second) = if is_bot { (body, icon) } else { (icon, body) };
    format!(
        r#"<div class="message {class}"><div class="message-content">{first}{second}</div></div>"#
    )
}

/// Render a whole transcript as a standalone page.
pub fn render_transcript(transcript: &Transcript, opts: &RenderOptions) -> String {
    let mut messages = String::new();
    for turn in transcript {
        messages.push_str(&render_turn(turn, opts));
        messages.push('\n');
    }
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Chat</title>\n\
         <style>{STYLESHEET}</style>\n</head>\n<body>\n<div class=\"chat\">\n\
         <div class=\"messages\">\n{messages}</div>\n</div>\n</body>\n</html>\n"
    )
}

/// Inline citation line: one anchor per source, `", "` between them.
pub fn render_sources(sources: &[String], policy: &LinkPolicy) -> String {
    let links: Vec<String> = sources.iter().map(|s| policy.anchor(s)).collect();
    format!(r#"<div class="sources">{}</div>"#, links.join(", "))
}

/// Markdown → HTML with raw HTML escaped and links rewritten by `policy`.
pub fn render_markdown(content: &str, policy: &LinkPolicy) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);

    // Links whose href was refused must also drop their closing tag.
    let mut open_links: Vec<bool> = Vec::new();
    let events = Parser::new_ext(content, opts).filter_map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link { dest_url, title, .. }) => {
            match policy.open_tag(&dest_url, &title) {
                Some(tag) => {
                    open_links.push(true);
                    Some(Event::InlineHtml(CowStr::from(tag)))
                }
                None => {
                    open_links.push(false);
                    None
                }
            }
        }
        Event::End(TagEnd::Link) => match open_links.pop() {
            Some(true) => Some(Event::InlineHtml(CowStr::Borrowed("</a>"))),
            _ => None,
        },
        other => Some(other),
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

fn icon_html(sender: Sender) -> String {
    let (class, glyph, label) = match sender {
        Sender::User => ("icon icon-user", "\u{1F464}", "user"),
        Sender::Bot => ("icon icon-bot", "\u{1F916}", "bot"),
    };
    format!(r#"<span class="{class}" role="img" aria-label="{label}">{glyph}</span>"#)
}

fn is_safe_href(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    match lower.split_once(':') {
        // A colon after a path separator is not a scheme.
        Some((scheme, _)) if !scheme.contains(['/', '?', '#']) => {
            matches!(scheme, "http" | "https" | "mailto")
        }
        _ => true,
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLESHEET: &str = r#"
body { background: #202123; font-family: sans-serif; }
.chat { max-width: 800px; width: 90%; margin: 3% auto; border: 1px solid #333;
  border-radius: 5px; background-color: #343541; padding: 20px;
  box-shadow: 0 4px 8px rgba(0, 0, 0, 0.2); overflow-y: auto; height: 80vh; }
.messages { padding: 16px; }
.message { display: flex; justify-content: flex-start; animation: fade-in 0.6s ease-in; }
.message-bot { justify-content: flex-end; }
.message-content { display: flex; align-items: center; background-color: #f1f1f1;
  padding: 10px; margin: 5px 0; border-radius: 5px; max-width: 80%; gap: 10px; }
.message-bot .message-content { background-color: #464454; color: #d1d5db; }
.message-bot .message-content a { color: #fff; }
.message-content a { font-weight: 600; }
.icon-user { font-size: 24px; }
.icon-bot { font-size: 36px; }
.sources { padding: 3px 0; font-size: 0.9em; }
@keyframes fade-in { from { opacity: 0; } to { opacity: 1; } }
"#;
