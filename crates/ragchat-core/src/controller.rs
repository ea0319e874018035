// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The transcript controller: owns the transcript, the input buffer and the
//! busy flag, and drives one backend query per user turn.
//!
//! # Lifecycle
//!
//! ```text
//!   Idle ──begin_submit──▶ AwaitingResponse ──complete(Ok|Err)──▶ Idle
//! ```
//!
//! `begin_submit` appends the user turn before anything is sent.  The caller
//! performs the request (inline via [`TranscriptController::submit`], or on a
//! background task as the TUI does) and hands the outcome to `complete`,
//! which appends the bot turn on success and only logs on failure.
//!
//! While awaiting, further submissions are refused and the input buffer is
//! read-only, so at most one request is ever outstanding.

use ragchat_client::{BackendError, ChatAnswer, ChatBackend};
use thiserror::Error;
use tracing::{debug, warn};

use crate::transcript::{ChatTurn, Transcript};

/// UI state.  There are no others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a query is already awaiting a response")]
    Busy,
    #[error("nothing to send")]
    EmptyInput,
}

/// A query accepted by the controller that still has to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub query: String,
}

/// How an accepted query ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// A bot turn was appended at this transcript index.
    Answered(usize),
    /// The request failed; nothing was appended.
    NoResponse,
    /// `complete` was called while idle.
    Ignored,
}

pub struct TranscriptController {
    transcript: Transcript,
    input: String,
    state: ChatState,
}

impl Default for TranscriptController {
    fn default() -> Self {
        Self::new(Transcript::new())
    }
}

impl TranscriptController {
    pub fn new(transcript: Transcript) -> Self {
        Self { transcript, input: String::new(), state: ChatState::Idle }
    }

    /// Read-only snapshot for rendering.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == ChatState::AwaitingResponse
    }

    // ── Input buffer ──────────────────────────────────────────────────────────

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer.  Refused while busy (input disabled).
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        match self.input_mut() {
            Some(buf) => {
                *buf = text.into();
                true
            }
            None => false,
        }
    }

    /// Mutable access to the input buffer, or `None` while busy.
    pub fn input_mut(&mut self) -> Option<&mut String> {
        if self.is_busy() {
            None
        } else {
            Some(&mut self.input)
        }
    }

    // ── Submit path ───────────────────────────────────────────────────────────

    /// Accept `text` as the next user turn.
    ///
    /// On success the user turn is already in the transcript and the
    /// controller is busy until [`complete`](Self::complete) is called.
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingQuery, SubmitError> {
        if self.is_busy() {
            debug!("submit refused: awaiting response");
            return Err(SubmitError::Busy);
        }
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        self.transcript.push(ChatTurn::user(text));
        self.state = ChatState::AwaitingResponse;
        debug!(turns = self.transcript.len(), "user turn appended, awaiting response");
        Ok(PendingQuery { query: text.to_string() })
    }

    /// Submit the current input buffer.
    pub fn begin_submit_input(&mut self) -> Result<PendingQuery, SubmitError> {
        let text = self.input.clone();
        self.begin_submit(&text)
    }

    /// Record the outcome of the outstanding query.
    ///
    /// Failures are written to the log and otherwise swallowed: the user
    /// turn stays without a reply.  Input and busy flag are reset either way.
    pub fn complete(&mut self, outcome: Result<ChatAnswer, BackendError>) -> Completion {
        if !self.is_busy() {
            debug!("completion ignored: no query outstanding");
            return Completion::Ignored;
        }
        let completion = match outcome {
            Ok(answer) => {
                self.transcript.push(ChatTurn::bot(answer));
                Completion::Answered(self.transcript.len() - 1)
            }
            Err(e) => {
                warn!(error = %e, "there was an error sending the message");
                Completion::NoResponse
            }
        };
        self.input.clear();
        self.state = ChatState::Idle;
        completion
    }

    /// Begin, send and complete one query inline.
    pub async fn submit(
        &mut self,
        backend: &dyn ChatBackend,
        text: &str,
    ) -> Result<Completion, SubmitError> {
        let pending = self.begin_submit(text)?;
        let outcome = backend.query(&pending.query).await;
        Ok(self.complete(outcome))
    }

    /// [`submit`](Self::submit) with the current input buffer.
    pub async fn submit_input(&mut self, backend: &dyn ChatBackend) -> Result<Completion, SubmitError> {
        let text = self.input.clone();
        self.submit(backend, &text).await
    }
}

#[cfg(test)]
mod tests {
    use ragchat_client::ScriptedBackend;

    use super::*;
    use crate::transcript::Sender;

    #[test]
    fn begin_submit_appends_user_turn_and_goes_busy() {
        let mut c = TranscriptController::default();
        let p = c.begin_submit("hello").unwrap();
        assert_eq!(p.query, "hello");
        assert_eq!(c.transcript().len(), 1);
        assert_eq!(c.transcript().turns()[0], ChatTurn::user("hello"));
        assert_eq!(c.state(), ChatState::AwaitingResponse);
    }

    #[test]
    fn second_submit_while_busy_is_refused() {
        let mut c = TranscriptController::default();
        c.begin_submit("one").unwrap();
        assert_eq!(c.begin_submit("two"), Err(SubmitError::Busy));
        assert_eq!(c.transcript().len(), 1);
    }

    #[test]
    fn whitespace_only_input_is_refused() {
        let mut c = TranscriptController::default();
        assert_eq!(c.begin_submit("  \t"), Err(SubmitError::EmptyInput));
        assert!(c.transcript().is_empty());
        assert!(!c.is_busy());
    }

    #[test]
    fn input_is_read_only_while_busy() {
        let mut c = TranscriptController::default();
        assert!(c.set_input("draft"));
        c.begin_submit_input().unwrap();
        assert!(!c.set_input("other"));
        assert!(c.input_mut().is_none());
        assert_eq!(c.input(), "draft");
    }

    #[test]
    fn success_appends_bot_turn_and_resets() {
        let mut c = TranscriptController::default();
        c.set_input("hello");
        c.begin_submit_input().unwrap();
        let done = c.complete(Ok(ChatAnswer::new("hi", vec!["http://x".into()])));
        assert_eq!(done, Completion::Answered(1));
        let bot = &c.transcript().turns()[1];
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.content, "hi");
        assert_eq!(bot.sources, ["http://x"]);
        assert_eq!(c.input(), "");
        assert_eq!(c.state(), ChatState::Idle);
    }

    #[test]
    fn failure_appends_nothing_and_resets() {
        let mut c = TranscriptController::default();
        c.set_input("hello");
        c.begin_submit_input().unwrap();
        let done = c.complete(Err(BackendError::Unavailable("down".into())));
        assert_eq!(done, Completion::NoResponse);
        assert_eq!(c.transcript().len(), 1);
        assert_eq!(c.input(), "");
        assert!(!c.is_busy());
    }

    #[test]
    fn complete_while_idle_is_ignored() {
        let mut c = TranscriptController::default();
        let done = c.complete(Ok(ChatAnswer::new("stray", vec![])));
        assert_eq!(done, Completion::Ignored);
        assert!(c.transcript().is_empty());
    }

    #[tokio::test]
    async fn inline_submit_issues_exactly_one_query() {
        let backend = ScriptedBackend::answering("hi", &["http://x"]);
        let mut c = TranscriptController::default();
        let done = c.submit(&backend, "hello").await.unwrap();
        assert_eq!(done, Completion::Answered(1));
        assert_eq!(backend.calls(), 1);
        assert_eq!(backend.queries.lock().unwrap().as_slice(), ["hello"]);
    }

    #[tokio::test]
    async fn empty_submit_never_reaches_backend() {
        let backend = ScriptedBackend::answering("unused", &[]);
        let mut c = TranscriptController::default();
        assert_eq!(c.submit(&backend, "").await, Err(SubmitError::EmptyInput));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn submit_input_sends_the_buffer_and_clears_it() {
        let backend = ScriptedBackend::answering("hi", &["http://x"]);
        let mut c = TranscriptController::default();
        assert!(c.set_input("from the buffer"));
        let done = c.submit_input(&backend).await.unwrap();
        assert_eq!(done, Completion::Answered(1));
        assert_eq!(backend.queries.lock().unwrap().as_slice(), ["from the buffer"]);
        assert_eq!(c.transcript().turns()[0], ChatTurn::user("from the buffer"));
        assert_eq!(c.input(), "");
        assert!(!c.is_busy());
    }
}
