// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Wire format of the `/chat` endpoint.
//!
//! The backend reports citations either as one string or as a list of
//! strings.  That union is resolved here, on receipt, into [`Sources`]; no
//! other crate ever sees the raw shape.

use serde::{Deserialize, Deserializer, Serialize};

/// Request body: `{"query": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

/// Response body: `{"answer": "...", "sources": "..." | ["...", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Sources,
}

/// The `sources` field exactly as the backend may send it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawSources {
    One(String),
    Many(Vec<String>),
}

/// Normalised citation list: zero or more non-empty, trimmed URL strings in
/// the order the backend listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Sources(Vec<String>);

impl Sources {
    /// Collapse every accepted shape into a plain list.
    ///
    /// A single string is split at `", "` separators, since the retrieval
    /// chain joins multiple citations into one `"a, b"` string.  List entries
    /// are only trimmed; a comma inside a list entry is part of that URL.
    pub fn normalize(raw: Option<RawSources>) -> Self {
        let items = match raw {
            None => Vec::new(),
            Some(RawSources::One(s)) => split_citations(&s)
                .into_iter()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            Some(RawSources::Many(list)) => list
                .into_iter()
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect(),
        };
        Self(items)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Split a joined citation string at commas followed by whitespace.  A bare
/// comma belongs to the URL it sits in.
fn split_citations(joined: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, _) in joined.match_indices(',') {
        if joined[i + 1..].starts_with(char::is_whitespace) {
            pieces.push(&joined[start..i]);
            start = i + 1;
        }
    }
    pieces.push(&joined[start..]);
    pieces
}

impl From<Vec<String>> for Sources {
    fn from(list: Vec<String>) -> Self {
        Self::normalize(Some(RawSources::Many(list)))
    }
}

impl<'de> Deserialize<'de> for Sources {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawSources>::deserialize(deserializer)?;
        Ok(Self::normalize(raw))
    }
}

/// One answered query, as seen by everything above the wire layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

impl ChatAnswer {
    pub fn new(answer: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Sources::from(sources).into_vec(),
        }
    }
}

impl From<QueryResponse> for ChatAnswer {
    fn from(resp: QueryResponse) -> Self {
        Self {
            answer: resp.answer,
            sources: resp.sources.into_vec(),
        }
    }
}
