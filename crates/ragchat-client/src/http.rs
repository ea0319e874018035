// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! HTTP driver for the `/chat` endpoint.
//!
//! One `POST` per query with a JSON `{query}` body and no authentication.
//! Any transport failure, non-2xx status or undecodable body is an error;
//! the error body schema of the backend is not interpreted.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{BackendError, ChatAnswer, ChatBackend, QueryRequest, QueryResponse};

pub struct HttpBackend {
    endpoint_url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Build a backend for `endpoint_url`.  With `timeout = None` a request
    /// may stay outstanding indefinitely.
    pub fn new(endpoint_url: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            endpoint_url: endpoint_url.into(),
            timeout,
            client: builder.build()?,
        })
    }

    fn map_transport(&self, e: reqwest::Error) -> BackendError {
        match self.timeout {
            Some(t) if e.is_timeout() => BackendError::Timeout(t),
            _ => BackendError::Transport(e),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn endpoint(&self) -> &str {
        &self.endpoint_url
    }

    async fn query(&self, query: &str) -> Result<ChatAnswer, BackendError> {
        debug!(url = %self.endpoint_url, query_len = query.len(), "POST query");
        let resp = self
            .client
            .post(&self.endpoint_url)
            .json(&QueryRequest::new(query))
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_transport(e))?;
        if !status.is_success() {
            return Err(BackendError::Status { status: status.as_u16(), body });
        }

        let parsed: QueryResponse = serde_json::from_str(&body)?;
        debug!(sources = parsed.sources.len(), "backend answered");
        Ok(parsed.into())
    }
}
