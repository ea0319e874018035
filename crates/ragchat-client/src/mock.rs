// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{BackendError, ChatAnswer, ChatBackend};

/// Deterministic offline backend.  Echoes the query back as the answer.
#[derive(Default)]
pub struct EchoBackend;

#[async_trait]
impl ChatBackend for EchoBackend {
    fn endpoint(&self) -> &str {
        "mock://echo"
    }

    async fn query(&self, query: &str) -> Result<ChatAnswer, BackendError> {
        Ok(ChatAnswer::new(format!("ECHO: {query}"), Vec::new()))
    }
}

/// A pre-scripted backend.  Each call to `query` pops the next outcome from
/// the front of the script, so tests can specify exact answer / failure
/// sequences without network access.
#[derive(Clone)]
pub struct ScriptedBackend {
    script: Arc<Mutex<VecDeque<Result<ChatAnswer, BackendError>>>>,
    /// Every query received, in order.
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<ChatAnswer, BackendError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Convenience: backend that answers once with `answer` and `sources`.
    pub fn answering(answer: impl Into<String>, sources: &[&str]) -> Self {
        let sources = sources.iter().map(|s| s.to_string()).collect();
        Self::new(vec![Ok(ChatAnswer::new(answer, sources))])
    }

    /// Convenience: backend whose single call fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(vec![Err(BackendError::Unavailable(reason.into()))])
    }

    /// Number of queries issued so far.
    pub fn calls(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn endpoint(&self) -> &str {
        "mock://scripted"
    }

    async fn query(&self, query: &str) -> Result<ChatAnswer, BackendError> {
        if let Ok(mut q) = self.queries.lock() {
            q.push(query.to_string());
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.unwrap_or_else(|| Err(BackendError::Unavailable("script exhausted".into())))
    }
}
