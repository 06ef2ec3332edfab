// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Deterministic backend double.
//!
//! Answers from a queue of scripted outcomes (succeeding once the queue
//! is empty) and records every call it receives.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::RemoteError;

use super::{RemoteOperation, ServerResult};

/// A call received by [`ScriptedRemote`]
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub operation: String,
    pub payload: Value,
}

#[derive(Debug, Default)]
struct Script {
    outcomes: VecDeque<Result<ServerResult, RemoteError>>,
    calls: Vec<RemoteCall>,
}

/// Scripted backend with optional fixed latency
#[derive(Debug, Default)]
pub struct ScriptedRemote {
    script: Mutex<Script>,
    latency: Option<Duration>,
}

impl ScriptedRemote {
    /// Backend that always succeeds immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every answer by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue a successful answer
    pub fn push_success(&self, result: ServerResult) {
        self.lock().outcomes.push_back(Ok(result));
    }

    /// Queue a failed round trip for the next call
    pub fn push_failure(&self, message: impl Into<String>) {
        let message = message.into();
        // Operation name is filled in when the failure is delivered
        self.lock().outcomes.push_back(Err(RemoteError::Failed {
            operation: String::new(),
            message,
        }));
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    /// Names of the operations received so far
    pub fn operations(&self) -> Vec<String> {
        self.lock().calls.iter().map(|c| c.operation.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        match self.script.lock() {
            Ok(script) => script,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn next_outcome(&self, operation: &str, payload: Value) -> Result<ServerResult, RemoteError> {
        let mut script = self.lock();
        let call_number = script.calls.len() + 1;
        script.calls.push(RemoteCall {
            operation: operation.to_string(),
            payload,
        });
        match script.outcomes.pop_front() {
            Some(Err(RemoteError::Failed { message, .. })) => Err(RemoteError::Failed {
                operation: operation.to_string(),
                message,
            }),
            Some(outcome) => outcome,
            None => Ok(ServerResult::ok(format!("{} completed", operation))
                .with_data(json!({ "id": format!("{}-{}", operation, call_number) }))),
        }
    }
}

#[async_trait]
impl RemoteOperation for ScriptedRemote {
    async fn execute(&self, operation: &str, payload: Value) -> Result<ServerResult, RemoteError> {
        let outcome = self.next_outcome(operation, payload);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_answers_succeed() {
        let remote = ScriptedRemote::new();
        let result = remote.execute("save", json!({ "a": 1 })).await.unwrap();
        assert!(result.success);
        assert_eq!(result.data_str("id"), Some("save-1"));
        assert_eq!(remote.calls()[0].payload, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn test_scripted_outcomes_in_order() {
        let remote = ScriptedRemote::new();
        remote.push_failure("backend down");
        remote.push_success(ServerResult::ok("second"));

        let err = remote.execute("save", Value::Null).await.unwrap_err();
        assert_eq!(
            err,
            RemoteError::Failed {
                operation: "save".to_string(),
                message: "backend down".to_string(),
            }
        );

        let ok = remote.execute("publish", Value::Null).await.unwrap();
        assert_eq!(ok.message.as_deref(), Some("second"));
        assert_eq!(remote.operations(), vec!["save", "publish"]);
    }
}
