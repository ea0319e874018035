// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crate::{app::App, chat::render_transcript_lines};

impl App {
    /// Width used to wrap message bodies.
    pub(crate) fn body_width(&self) -> u16 {
        match self.opts.wrap_width {
            0 => self.chat_width,
            w => w.min(self.chat_width),
        }
    }

    /// Rebuild `chat_lines` from the controller's transcript.
    pub(crate) fn rerender_chat(&mut self) {
        let ascii = self.ascii();
        self.chat_lines =
            render_transcript_lines(self.controller.transcript(), self.body_width(), ascii);
    }

    pub(crate) fn ascii(&self) -> bool {
        if std::env::var("RAGCHAT_ASCII").as_deref() == Ok("1") {
            return true;
        }
        self.opts.ascii
    }

    // ── Scroll helpers ────────────────────────────────────────────────────────

    fn max_scroll(&self) -> u16 {
        u16::try_from(self.chat_lines.len())
            .unwrap_or(u16::MAX)
            .saturating_sub(self.chat_height)
    }

    pub(crate) fn scroll_up(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
        self.auto_scroll = false;
    }

    pub(crate) fn scroll_down(&mut self, n: u16) {
        let max = self.max_scroll();
        self.scroll_offset = self.scroll_offset.saturating_add(n).min(max);
        if self.scroll_offset >= max {
            self.auto_scroll = true;
        }
    }

    pub(crate) fn scroll_to_bottom(&mut self) {
        if self.auto_scroll {
            self.scroll_offset = self.max_scroll();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{App, AppOptions};
    use crate::keys::Action;

    #[tokio::test]
    async fn scrolling_is_clamped_and_bottom_follows_new_turns() {
        let opts = AppOptions { seed_demo: true, ascii: true, ..AppOptions::default() };
        let (mut app, _rx) = App::for_testing(opts);
        app.chat_height = 2;
        app.rerender_chat();
        let max = app.chat_lines.len() as u16 - 2;

        app.dispatch(Action::ScrollTop).await;
        assert_eq!(app.scroll_offset, 0);
        assert!(!app.auto_scroll);
        app.dispatch(Action::ScrollUp).await;
        assert_eq!(app.scroll_offset, 0);

        for _ in 0..100 {
            app.dispatch(Action::ScrollDown).await;
        }
        assert_eq!(app.scroll_offset, max);
        assert!(app.auto_scroll);

        app.type_text("next").await;
        app.dispatch(Action::Submit).await;
        assert_eq!(app.scroll_offset, app.chat_lines.len() as u16 - 2);
    }

    #[test]
    fn scroll_limit_saturates_for_very_long_sessions() {
        let (mut app, _rx) = App::for_testing(AppOptions::default());
        app.chat_lines = vec![ratatui::text::Line::default(); 70_000];
        app.chat_height = 10;
        assert_eq!(app.max_scroll(), u16::MAX - 10);
        app.scroll_down(u16::MAX);
        assert_eq!(app.scroll_offset, u16::MAX - 10);
    }

    #[test]
    fn wrap_width_is_capped_by_pane_width() {
        let opts = AppOptions { wrap_width: 200, ..AppOptions::default() };
        let (mut app, _rx) = App::for_testing(opts);
        app.chat_width = 60;
        assert_eq!(app.body_width(), 60);
        app.opts.wrap_width = 0;
        assert_eq!(app.body_width(), 60);
        app.opts.wrap_width = 40;
        assert_eq!(app.body_width(), 40);
    }
}
