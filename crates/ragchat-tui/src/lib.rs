// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod app;
mod backend;
mod chat;
mod keys;
mod layout;
mod markdown;
mod widgets;

pub use app::{App, AppOptions};
pub use chat::{render_transcript_lines, render_turn_lines};
pub use markdown::{render_markdown, StyledLines};
