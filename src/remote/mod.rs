// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Backend round-trip boundary.
//!
//! This module provides a trait-based abstraction over the backend,
//! allowing the simulator, a scripted test double and the HTTP client to
//! be used interchangeably.

pub mod http;
pub mod scripted;
pub mod simulator;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RemoteError;

pub use http::HttpRemote;
pub use scripted::{RemoteCall, ScriptedRemote};
pub use simulator::SimulatedRemote;

/// Answer of a backend round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ServerResult {
    /// Successful result with a message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Attach a data payload
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// String field of the data payload
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.as_ref()?.get(key)?.as_str()
    }

    /// Turn a `success = false` answer into an error
    pub fn into_checked(self, operation: &str) -> Result<Self, RemoteError> {
        if self.success {
            Ok(self)
        } else {
            Err(RemoteError::Rejected {
                operation: operation.to_string(),
                message: self.message.unwrap_or_else(|| "no reason given".to_string()),
            })
        }
    }
}

/// A named backend operation taking a JSON payload
#[async_trait]
pub trait RemoteOperation: Send + Sync {
    /// Perform `operation` with `payload`.
    ///
    /// # Returns
    /// * `Ok(ServerResult)` when the round trip completed
    /// * `Err(RemoteError)` tagged with the operation name otherwise
    async fn execute(&self, operation: &str, payload: Value) -> Result<ServerResult, RemoteError>;
}

/// Run a backend call, failing with [`RemoteError::Timeout`] if it does not
/// finish within `timeout`. `None` waits forever.
pub async fn with_timeout<T, F>(
    timeout: Option<Duration>,
    operation: &str,
    call: F,
) -> Result<T, RemoteError>
where
    F: Future<Output = Result<T, RemoteError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| RemoteError::Timeout {
                operation: operation.to_string(),
                after_ms: limit.as_millis() as u64,
            })?,
        None => call.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_with_timeout() {
        let fast = with_timeout(Some(Duration::from_secs(1)), "save", async { Ok(7) }).await;
        assert_eq!(fast, Ok(7));

        let slow = with_timeout(Some(Duration::from_millis(10)), "save", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(
            slow,
            Err(RemoteError::Timeout {
                operation: "save".to_string(),
                after_ms: 10,
            })
        );

        let unbounded = with_timeout(None, "stats", async { Err::<(), _>(RemoteError::Failed {
            operation: "stats".to_string(),
            message: "down".to_string(),
        }) })
        .await;
        assert!(matches!(unbounded, Err(RemoteError::Failed { .. })));
    }

    #[test]
    fn test_server_result_json_shape() {
        let result = ServerResult::ok("saved").with_data(json!({ "id": "abc" }));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({ "success": true, "message": "saved", "data": { "id": "abc" } }));
        assert_eq!(result.data_str("id"), Some("abc"));
        assert_eq!(result.data_str("path"), None);

        let parsed: ServerResult = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.message.is_none());
    }

    #[test]
    fn test_into_checked() {
        assert!(ServerResult::ok("fine").into_checked("save").is_ok());

        let rejected = ServerResult {
            success: false,
            message: Some("quota exceeded".to_string()),
            data: None,
        };
        assert_eq!(
            rejected.into_checked("save"),
            Err(RemoteError::Rejected {
                operation: "save".to_string(),
                message: "quota exceeded".to_string(),
            })
        );
    }
}
