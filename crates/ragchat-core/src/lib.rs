// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod controller;
pub mod html;
mod transcript;

pub use controller::{ChatState, Completion, PendingQuery, SubmitError, TranscriptController};
pub use transcript::{demo_turns, ChatTurn, Sender, Transcript};
