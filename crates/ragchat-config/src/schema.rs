// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Endpoint used when no configuration layer sets one.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:5000/chat";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

/// Which backend implementation answers queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `POST {query}` to `endpoint_url` over HTTP.
    #[default]
    Http,
    /// Offline echo backend.  Useful for trying the UI without a server.
    Mock,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Http => write!(f, "http"),
            BackendKind::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Full URL of the query endpoint, e.g. `http://localhost:5000/chat`.
    pub endpoint_url: String,
    /// Per-request timeout in seconds.  `0` disables the timeout, in which
    /// case a hung backend keeps the session busy until it answers.
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// The configured timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Http,
            endpoint_url: DEFAULT_ENDPOINT_URL.into(),
            timeout_secs: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Width used for markdown wrapping (0 = pane width)
    pub wrap_width: u16,
    /// Use plain ASCII borders/icons instead of Unicode glyphs.
    /// Can also be forced with the RAGCHAT_ASCII=1 environment variable.
    pub ascii_borders: bool,
    /// Start the session with the canned demo exchange in the transcript.
    pub seed_demo: bool,
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
