// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Plain-text renderings of turns for headless output.

use ragchat_core::html::{render_turn, RenderOptions};
use ragchat_core::{ChatTurn, Sender};

use crate::cli::OutputFormatArg;

/// Conversation markdown: a `## User` / `## Assistant` section, the body and,
/// for answers with citations, a `Sources:` line.
pub fn turn_markdown(turn: &ChatTurn) -> String {
    let heading = match turn.sender {
        Sender::User => "User",
        Sender::Bot => "Assistant",
    };
    let mut out = format!("## {heading}\n\n{}\n", turn.content.trim_end());
    let sources = turn.citations();
    if !sources.is_empty() {
        out.push_str(&format!("\nSources: {}\n", sources.join(", ")));
    }
    out
}

pub fn format_turn(turn: &ChatTurn, format: OutputFormatArg) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormatArg::Markdown => turn_markdown(turn),
        OutputFormatArg::Html => format!("{}\n", render_turn(turn, &RenderOptions::default())),
        OutputFormatArg::Json => format!("{}\n", serde_json::to_string_pretty(turn)?),
    })
}

#[cfg(test)]
mod tests {
    use ragchat_client::ChatAnswer;

    use super::*;

    fn answer() -> ChatTurn {
        ChatTurn::bot(ChatAnswer::new("hi\n", vec!["a".into(), "b".into()]))
    }

    #[test]
    fn markdown_has_heading_body_and_sources() {
        assert_eq!(turn_markdown(&answer()), "## Assistant\n\nhi\n\nSources: a, b\n");
        assert_eq!(turn_markdown(&ChatTurn::user("q")), "## User\n\nq\n");
    }

    #[test]
    fn json_output_carries_sender_and_sources() {
        let json = format_turn(&answer(), OutputFormatArg::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["sender"], "bot");
        assert_eq!(v["sources"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn html_output_links_each_source() {
        let html = format_turn(&answer(), OutputFormatArg::Html).unwrap();
        assert_eq!(html.matches("<a ").count(), 2);
    }
}
