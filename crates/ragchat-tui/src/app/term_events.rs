// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Terminal event handler: keyboard, mouse, and resize dispatch.

use crossterm::event::{Event, KeyEventKind, MouseEventKind};

use crate::{
    app::{App, FocusPane},
    keys::{map_key, Action},
};

impl App {
    /// Handle one terminal event.  Returns `true` when the app should quit.
    pub(crate) async fn handle_term_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                if self.show_help {
                    self.show_help = false;
                    return false;
                }
                let in_input = self.focus == FocusPane::Input;
                if let Some(action) = map_key(k, in_input, self.pending_nav) {
                    if action == Action::NavPrefix {
                        self.pending_nav = true;
                        return false;
                    }
                    self.pending_nav = false;
                    return self.dispatch(action).await;
                }
                self.pending_nav = false;
                false
            }
            Event::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::ScrollUp => self.scroll_up(3),
                    MouseEventKind::ScrollDown => self.scroll_down(3),
                    _ => {}
                }
                false
            }
            Event::Paste(text) => {
                let line = text.replace(['\r', '\n'], " ");
                for c in line.chars() {
                    self.dispatch(Action::InputChar(c)).await;
                }
                false
            }
            Event::Resize(..) => {
                self.scroll_to_bottom();
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;
    use crate::app::AppOptions;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, state: KeyEventState::NONE })
    }

    #[tokio::test]
    async fn ctrl_w_chord_switches_focus() {
        let (mut app, _rx) = App::for_testing(AppOptions::default());
        assert_eq!(app.focus, FocusPane::Input);
        app.handle_term_event(press(KeyCode::Char('w'), KeyModifiers::CONTROL)).await;
        assert!(app.pending_nav);
        app.handle_term_event(press(KeyCode::Char('k'), KeyModifiers::NONE)).await;
        assert!(!app.pending_nav);
        assert_eq!(app.focus, FocusPane::Chat);
        assert_eq!(app.controller.input(), "", "chord key must not be typed");
    }

    #[tokio::test]
    async fn typing_then_enter_submits() {
        let (mut app, mut rx) = App::for_testing(AppOptions::default());
        for c in "hi".chars() {
            app.handle_term_event(press(KeyCode::Char(c), KeyModifiers::NONE)).await;
        }
        app.handle_term_event(press(KeyCode::Enter, KeyModifiers::NONE)).await;
        assert!(rx.try_recv().is_ok());
        assert!(app.controller.is_busy());
    }

    #[tokio::test]
    async fn any_key_closes_help() {
        let (mut app, _rx) = App::for_testing(AppOptions::default());
        app.handle_term_event(press(KeyCode::F(1), KeyModifiers::NONE)).await;
        assert!(app.show_help);
        let quit = app.handle_term_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)).await;
        assert!(!quit);
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let (mut app, _rx) = App::for_testing(AppOptions::default());
        assert!(app.handle_term_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)).await);
    }

    #[tokio::test]
    async fn paste_flattens_newlines_into_the_input() {
        let (mut app, _rx) = App::for_testing(AppOptions::default());
        app.handle_term_event(Event::Paste("a\nb".into())).await;
        assert_eq!(app.controller.input(), "a b");
    }
}
