// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::time::Duration;

use thiserror::Error;

/// Every way a query can fail to produce an answer.
///
/// Callers above the wire layer treat all variants the same ("no
/// response"); the distinction only exists for the diagnostic log.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to backend failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("backend responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("backend did not respond within {0:?}")]
    Timeout(Duration),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
