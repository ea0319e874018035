// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Top-level TUI application state and event loop.

pub(crate) mod chat_ops;
pub(crate) mod dispatch;
pub(crate) mod term_events;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::EventStream;
use futures::StreamExt;
use ragchat_client::ChatBackend;
use ragchat_config::TuiConfig;
use ragchat_core::{Transcript, TranscriptController};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    backend::{backend_task, BackendEvent, BackendRequest},
    keys::Action,
    layout::AppLayout,
    markdown::StyledLines,
    widgets::{draw_chat, draw_help, draw_input, draw_status},
};

// ── Public types ──────────────────────────────────────────────────────────────

/// Options that control the TUI behaviour.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Question submitted as soon as the UI is up.
    pub initial_prompt: Option<String>,
    /// Maximum width of rendered message bodies; 0 uses the pane width.
    pub wrap_width: u16,
    pub ascii: bool,
    /// Start with the canned demo exchange in the transcript.
    pub seed_demo: bool,
}

impl AppOptions {
    pub fn from_config(cfg: &TuiConfig) -> Self {
        Self {
            initial_prompt: None,
            wrap_width: cfg.wrap_width,
            ascii: cfg.ascii_borders,
            seed_demo: cfg.seed_demo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FocusPane {
    Chat,
    Input,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub(crate) controller: TranscriptController,
    backend: Arc<dyn ChatBackend>,
    pub(crate) opts: AppOptions,
    pub(crate) focus: FocusPane,
    pub(crate) pending_nav: bool,
    pub(crate) show_help: bool,
    /// Byte offset of the cursor in the input buffer.
    pub(crate) input_cursor: usize,
    pub(crate) chat_lines: StyledLines,
    pub(crate) scroll_offset: u16,
    pub(crate) chat_height: u16,
    pub(crate) chat_width: u16,
    pub(crate) auto_scroll: bool,
    pub(crate) spinner_tick: usize,
    pub(crate) request_tx: Option<mpsc::Sender<BackendRequest>>,
    event_rx: Option<mpsc::Receiver<BackendEvent>>,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, opts: AppOptions) -> Self {
        let transcript = if opts.seed_demo { Transcript::with_demo() } else { Transcript::new() };
        let mut app = Self {
            controller: TranscriptController::new(transcript),
            backend,
            opts,
            focus: FocusPane::Input,
            pending_nav: false,
            show_help: false,
            input_cursor: 0,
            chat_lines: Vec::new(),
            scroll_offset: 0,
            chat_height: 24,
            chat_width: 80,
            auto_scroll: true,
            spinner_tick: 0,
            request_tx: None,
            event_rx: None,
        };
        app.rerender_chat();
        app
    }

    /// Run the TUI event loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        let (request_tx, request_rx) = mpsc::channel::<BackendRequest>(4);
        let (event_tx, event_rx) = mpsc::channel::<BackendEvent>(4);
        self.request_tx = Some(request_tx);
        self.event_rx = Some(event_rx);

        let backend = self.backend.clone();
        tokio::spawn(async move {
            backend_task(backend, request_rx, event_tx).await;
        });

        if let Some(prompt) = self.opts.initial_prompt.take() {
            self.controller.set_input(prompt.clone());
            self.input_cursor = prompt.len();
            self.dispatch(Action::Submit).await;
        }

        let mut crossterm_events = EventStream::new();
        let mut spinner = tokio::time::interval(Duration::from_millis(100));

        loop {
            if let Ok(size) = terminal.size() {
                let layout = AppLayout::compute(Rect::new(0, 0, size.width, size.height));
                self.chat_height = layout.chat_inner_height().max(1);
                let width = layout.chat_inner_width().max(20);
                if width != self.chat_width {
                    self.chat_width = width;
                    self.rerender_chat();
                }
            }

            let ascii = self.ascii();
            terminal.draw(|frame| {
                let layout = AppLayout::new(frame);
                draw_status(
                    frame,
                    layout.status_bar,
                    self.backend.endpoint(),
                    self.controller.is_busy(),
                    self.spinner_tick,
                    self.controller.transcript().len(),
                    ascii,
                );
                draw_chat(
                    frame,
                    layout.chat_pane,
                    &self.chat_lines,
                    self.scroll_offset,
                    self.focus == FocusPane::Chat,
                    ascii,
                );
                draw_input(
                    frame,
                    layout.input_pane,
                    self.controller.input(),
                    self.input_cursor,
                    self.focus == FocusPane::Input,
                    self.controller.is_busy(),
                    self.spinner_tick,
                    ascii,
                );
                if self.show_help {
                    draw_help(frame, ascii);
                }
            })?;

            tokio::select! {
                Some(event) = self.recv_backend_event() => {
                    self.handle_backend_event(event);
                }
                Some(Ok(term_event)) = crossterm_events.next() => {
                    if self.handle_term_event(term_event).await { break; }
                }
                _ = spinner.tick() => {
                    if self.controller.is_busy() {
                        self.spinner_tick = self.spinner_tick.wrapping_add(1);
                    }
                }
            }
        }

        debug!("TUI loop finished");
        Ok(())
    }

    async fn recv_backend_event(&mut self) -> Option<BackendEvent> {
        if let Some(rx) = &mut self.event_rx { rx.recv().await } else { None }
    }

    pub(crate) fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Finished(outcome) => {
                self.controller.complete(outcome);
                self.input_cursor = 0;
                self.rerender_chat();
                self.scroll_to_bottom();
            }
        }
    }
}

// ── Test helpers ──────────────────────────────────────────────────────────────

#[cfg(test)]
impl App {
    /// Construct an `App` wired to an echo backend.
    ///
    /// The returned receiver stands in for the background task; call
    /// `rx.try_recv()` to assert on requests dispatched by submit actions.
    pub(crate) fn for_testing(
        opts: AppOptions,
    ) -> (Self, mpsc::Receiver<BackendRequest>) {
        let (tx, rx) = mpsc::channel(4);
        let mut app = Self::new(Arc::new(ragchat_client::EchoBackend), opts);
        app.request_tx = Some(tx);
        (app, rx)
    }

    /// Type `text` into the input pane key by key.
    pub(crate) async fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.dispatch(Action::InputChar(c)).await;
        }
    }
}
