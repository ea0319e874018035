// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Action dispatch: input editing, scrolling and the submit path.

use ragchat_client::BackendError;
use ragchat_core::SubmitError;
use tracing::debug;

use crate::{
    app::{App, FocusPane},
    backend::BackendRequest,
    keys::Action,
};

impl App {
    /// Apply `action`.  Returns `true` when the app should quit.
    pub(crate) async fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Help => self.show_help = !self.show_help,
            Action::NavPrefix => self.pending_nav = true,
            Action::FocusChat => self.focus = FocusPane::Chat,
            Action::FocusInput => self.focus = FocusPane::Input,

            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::ScrollPageUp => self.scroll_up(self.chat_height.saturating_sub(1).max(1)),
            Action::ScrollPageDown => self.scroll_down(self.chat_height.saturating_sub(1).max(1)),
            Action::ScrollTop => {
                self.scroll_offset = 0;
                self.auto_scroll = false;
            }
            Action::ScrollBottom => {
                self.auto_scroll = true;
                self.scroll_to_bottom();
            }

            Action::Submit => self.submit().await,

            edit => self.edit_input(edit),
        }
        false
    }

    /// Hand the input buffer to the controller and the background task.
    async fn submit(&mut self) {
        let pending = match self.controller.begin_submit_input() {
            Ok(p) => p,
            Err(SubmitError::Busy) | Err(SubmitError::EmptyInput) => return,
        };
        self.auto_scroll = true;
        self.rerender_chat();
        self.scroll_to_bottom();

        let sent = match &self.request_tx {
            Some(tx) => tx.send(BackendRequest::Query(pending.query)).await.is_ok(),
            None => false,
        };
        if !sent {
            debug!("backend task unavailable");
            self.controller.complete(Err(BackendError::Unavailable(
                "backend task is not running".into(),
            )));
            self.input_cursor = 0;
            self.rerender_chat();
        }
    }

    /// Cursor and text editing.  Ignored while a query is outstanding.
    fn edit_input(&mut self, action: Action) {
        let cursor = self.input_cursor;
        let Some(buf) = self.controller.input_mut() else {
            return;
        };
        let cursor = cursor.min(buf.len());
        let new_cursor = match action {
            Action::InputChar(c) => {
                buf.insert(cursor, c);
                cursor + c.len_utf8()
            }
            Action::InputBackspace => {
                if cursor == 0 {
                    0
                } else {
                    let prev = prev_char_boundary(buf, cursor);
                    buf.replace_range(prev..cursor, "");
                    prev
                }
            }
            Action::InputDelete => {
                if cursor < buf.len() {
                    let next = next_char_boundary(buf, cursor);
                    buf.replace_range(cursor..next, "");
                }
                cursor
            }
            Action::InputMoveCursorLeft => prev_char_boundary(buf, cursor),
            Action::InputMoveCursorRight => next_char_boundary(buf, cursor),
            Action::InputMoveWordLeft => prev_word_boundary(buf, cursor),
            Action::InputMoveWordRight => next_word_boundary(buf, cursor),
            Action::InputMoveLineStart => 0,
            Action::InputMoveLineEnd => buf.len(),
            Action::InputDeleteToEnd => {
                buf.truncate(cursor);
                cursor
            }
            Action::InputDeleteToStart => {
                buf.replace_range(..cursor, "");
                0
            }
            _ => cursor,
        };
        self.input_cursor = new_cursor;
    }
}

// ── Character and word boundary helpers ──────────────────────────────────────

pub(crate) fn prev_char_boundary(s: &str, pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut p = pos - 1;
    while p > 0 && !s.is_char_boundary(p) {
        p -= 1;
    }
    p
}

pub(crate) fn next_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let mut p = pos + 1;
    while p < s.len() && !s.is_char_boundary(p) {
        p += 1;
    }
    p
}

pub(crate) fn prev_word_boundary(s: &str, pos: usize) -> usize {
    let bytes   = &s.as_bytes()[..pos];
    let trimmed = bytes.iter().rposition(|&b| b != b' ').map(|i| i + 1).unwrap_or(0);
    bytes[..trimmed].iter().rposition(|&b| b == b' ').map(|i| i + 1).unwrap_or(0)
}

pub(crate) fn next_word_boundary(s: &str, pos: usize) -> usize {
    let bytes = &s.as_bytes()[pos..];
    let start = bytes.iter().position(|&b| b != b' ').unwrap_or(bytes.len());
    let end   = bytes[start..].iter().position(|&b| b == b' ').unwrap_or(bytes.len() - start);
    pos + start + end
}
