// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// All logical actions the TUI can perform, independent of key binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusChat,
    FocusInput,
    /// First key of the Ctrl+w nav chord (vim-style window navigation).
    NavPrefix,

    // Scrolling (in chat pane)
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollTop,
    ScrollBottom,

    // Input
    InputChar(char),
    InputBackspace,
    InputDelete,
    InputMoveCursorLeft,
    InputMoveCursorRight,
    InputMoveWordLeft,
    InputMoveWordRight,
    InputMoveLineStart,
    InputMoveLineEnd,
    InputDeleteToEnd,
    InputDeleteToStart,
    Submit,

    // App
    Quit,
    Help,
}

/// Map a raw key event to an [`Action`], depending on which pane has focus.
///
/// `pending_nav` is true when a Ctrl+w prefix has been received but not yet
/// resolved.  In that state only j/k (and anything else to cancel) matter.
pub fn map_key(event: KeyEvent, in_input: bool, pending_nav: bool) -> Option<Action> {
    let ctrl  = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt   = event.modifiers.contains(KeyModifiers::ALT);
    let plain = !ctrl && !alt;

    if pending_nav {
        return match event.code {
            KeyCode::Char('k') | KeyCode::Up   => Some(Action::FocusChat),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::FocusInput),
            _ => None,
        };
    }

    match event.code {
        // ── Input-pane overrides come first so they shadow global bindings ────
        KeyCode::Char('u') if ctrl && in_input  => Some(Action::InputDeleteToStart),
        KeyCode::Char('k') if ctrl && in_input  => Some(Action::InputDeleteToEnd),

        // ── Global bindings ───────────────────────────────────────────────────
        KeyCode::Char('q') if ctrl => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('w') if ctrl => Some(Action::NavPrefix),
        KeyCode::F(1) => Some(Action::Help),
        KeyCode::PageUp   => Some(Action::ScrollPageUp),
        KeyCode::PageDown => Some(Action::ScrollPageDown),

        // ── Input pane ────────────────────────────────────────────────────────
        KeyCode::Enter     if in_input          => Some(Action::Submit),
        KeyCode::Backspace if in_input          => Some(Action::InputBackspace),
        KeyCode::Delete    if in_input          => Some(Action::InputDelete),
        KeyCode::Left  if in_input && ctrl      => Some(Action::InputMoveWordLeft),
        KeyCode::Right if in_input && ctrl      => Some(Action::InputMoveWordRight),
        KeyCode::Left  if in_input              => Some(Action::InputMoveCursorLeft),
        KeyCode::Right if in_input              => Some(Action::InputMoveCursorRight),
        KeyCode::Home  if in_input              => Some(Action::InputMoveLineStart),
        KeyCode::End   if in_input              => Some(Action::InputMoveLineEnd),
        KeyCode::Char(c) if in_input && plain   => Some(Action::InputChar(c)),

        // ── Chat pane ─────────────────────────────────────────────────────────
        KeyCode::Up   | KeyCode::Char('k') if !in_input && plain => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') if !in_input && plain => Some(Action::ScrollDown),
        KeyCode::Char('u') if ctrl && !in_input => Some(Action::ScrollPageUp),
        KeyCode::Char('d') if ctrl && !in_input => Some(Action::ScrollPageDown),
        KeyCode::Char('g') | KeyCode::Home if !in_input && plain => Some(Action::ScrollTop),
        KeyCode::Char('G') | KeyCode::End  if !in_input          => Some(Action::ScrollBottom),
        KeyCode::Enter | KeyCode::Char('i') if !in_input && plain => Some(Action::FocusInput),

        _ => None,
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
