// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;

use crate::{BackendError, ChatAnswer};

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Where queries go, for status display.
    fn endpoint(&self) -> &str;

    /// Send one query and wait for the answer.
    ///
    /// Exactly one request is made per call.  Implementations never retry.
    async fn query(&self, query: &str) -> Result<ChatAnswer, BackendError>;
}
