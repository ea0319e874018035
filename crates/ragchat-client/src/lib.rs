// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod backend;
mod error;
mod http;
mod mock;
mod types;

pub use backend::ChatBackend;
pub use error::BackendError;
pub use http::HttpBackend;
pub use mock::{EchoBackend, ScriptedBackend};
pub use types::*;

use ragchat_config::{BackendConfig, BackendKind};

/// Construct a boxed [`ChatBackend`] from configuration.
///
/// - `http` → [`HttpBackend`] against `endpoint_url`
/// - `mock` → [`EchoBackend`]
pub fn from_config(cfg: &BackendConfig) -> anyhow::Result<Box<dyn ChatBackend>> {
    match cfg.kind {
        BackendKind::Http => {
            let url = cfg.endpoint_url.trim();
            if url.is_empty() {
                anyhow::bail!("backend.endpoint_url is empty");
            }
            Ok(Box::new(HttpBackend::new(url, cfg.timeout())?))
        }
        BackendKind::Mock => Ok(Box::new(EchoBackend)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_kind_uses_configured_endpoint() {
        let cfg = BackendConfig {
            endpoint_url: "http://rag.example/chat".into(),
            ..BackendConfig::default()
        };
        let b = from_config(&cfg).unwrap();
        assert_eq!(b.endpoint(), "http://rag.example/chat");
    }

    #[test]
    fn mock_kind_needs_no_endpoint() {
        let cfg = BackendConfig {
            kind: BackendKind::Mock,
            endpoint_url: String::new(),
            ..BackendConfig::default()
        };
        assert_eq!(from_config(&cfg).unwrap().endpoint(), "mock://echo");
    }

    #[test]
    fn empty_http_endpoint_is_rejected() {
        let cfg = BackendConfig { endpoint_url: "  ".into(), ..BackendConfig::default() };
        assert!(from_config(&cfg).is_err());
    }
}
