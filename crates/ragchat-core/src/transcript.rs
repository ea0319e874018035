// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Chat turns and the append-only transcript that holds them.

use ragchat_client::ChatAnswer;
use serde::Serialize;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn is_bot(self) -> bool {
        matches!(self, Sender::Bot)
    }
}

/// One message in the transcript.
///
/// `sources` is only ever populated on bot turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub sender: Sender,
    /// Markdown body.
    pub content: String,
    pub sources: Vec<String>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, content: text.into(), sources: Vec::new() }
    }

    pub fn bot(answer: ChatAnswer) -> Self {
        Self { sender: Sender::Bot, content: answer.answer, sources: answer.sources }
    }

    /// Sources to display: always empty for user turns.
    pub fn citations(&self) -> &[String] {
        match self.sender {
            Sender::Bot => &self.sources,
            Sender::User => &[],
        }
    }
}

/// Ordered history of the current session.  Insertion order is
/// chronological order; turns are never removed or reordered.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript pre-seeded with the canned demo exchange.
    pub fn with_demo() -> Self {
        let mut t = Self::new();
        for turn in demo_turns() {
            t.push(turn);
        }
        t
    }

    pub(crate) fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatTurn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatTurn;
    type IntoIter = std::slice::Iter<'a, ChatTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// The example exchange shown by the widget before any real traffic.
pub fn demo_turns() -> Vec<ChatTurn> {
    vec![
        ChatTurn::user("Can you link me the sheet to calculate costs for a staff car?"),
        ChatTurn::bot(ChatAnswer::new(
            "You can calculate the total cost for you as an employee using this Excel document: \
             [ALD Personalbil.xlsx](http://wikiregent.wpengine.com/wp-content/uploads/2018/04/ALD-Personalbil.xlsx)\n",
            vec!["https://intern.regent.se/en/staff-car/".into()],
        )),
    ]
}
