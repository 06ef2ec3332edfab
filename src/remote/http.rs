// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! HTTP backend client.
//!
//! Each operation is a JSON `POST` to `{base_url}/{operation}` whose body
//! is a [`ServerResult`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::RemoteError;

use super::{RemoteOperation, ServerResult};

const USER_AGENT: &str = concat!("riffsmith/", env!("CARGO_PKG_VERSION"));

/// Networked backend
#[derive(Debug, Clone)]
pub struct HttpRemote {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport {
                operation: "connect".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Endpoint for an operation
    pub fn endpoint(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), operation)
    }
}

#[async_trait]
impl RemoteOperation for HttpRemote {
    async fn execute(&self, operation: &str, payload: Value) -> Result<ServerResult, RemoteError> {
        let url = self.endpoint(operation);
        let transport = |message: String| RemoteError::Transport {
            operation: operation.to_string(),
            message,
        };

        debug!(operation, url = %url, "Calling backend");

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RemoteError::Failed {
                operation: operation.to_string(),
                message: format!("HTTP {}: {}", status.as_u16(), error_text),
            });
        }

        response
            .json::<ServerResult>()
            .await
            .map_err(|e| transport(e.to_string()))
    }
}
