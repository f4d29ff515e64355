//! Concurrent dispatch of independent REST commands.
//!
//! Every command in a batch runs as its own spawned task. Results are
//! collected in completion order and a failing command never cancels its
//! siblings.

use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::client::{parse_base_url, parse_body};
use crate::{EffectError, Result};

/// One remote command: a path below the dispatcher's base URL and a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCommand {
    pub path: String,
    pub payload: Value,
}

impl RemoteCommand {
    pub fn new(path: impl Into<String>, payload: Value) -> Self {
        Self {
            path: path.into(),
            payload,
        }
    }
}

/// Result of one command of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: String,
    pub result: Result<Value>,
}

/// A command that failed, as surfaced to the caller.
#[derive(Debug)]
pub struct BatchFailure {
    pub path: String,
    pub error: EffectError,
}

/// Outcomes of a batch, in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Collapse the report: all bodies on full success, otherwise every
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::BatchPartialFailure` listing each failed command.
    pub fn into_result(self) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(self.outcomes.len());
        let mut failures = Vec::new();
        for outcome in self.outcomes {
            match outcome.result {
                Ok(value) => values.push(value),
                Err(error) => failures.push(BatchFailure {
                    path: outcome.path,
                    error,
                }),
            }
        }

        if failures.is_empty() {
            Ok(values)
        } else {
            Err(EffectError::BatchPartialFailure(failures))
        }
    }
}

/// Fans out batches of commands to one REST service.
#[derive(Debug, Clone)]
pub struct BatchCommandDispatcher {
    client: reqwest::Client,
    base: Url,
    token: String,
    timeout: Option<Duration>,
}

impl BatchCommandDispatcher {
    /// Create a dispatcher for `base_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::InvalidUrl` for a malformed base URL.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            base: parse_base_url(base_url)?,
            token: token.into(),
            timeout: None,
        })
    }

    /// Set a per-command timeout. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run every command concurrently and report each outcome.
    ///
    /// Must be called from within a tokio runtime. Commands already started
    /// keep running to completion even if this future is dropped.
    pub async fn dispatch(&self, commands: Vec<RemoteCommand>) -> BatchReport {
        debug!(count = commands.len(), "dispatching batch");
        let mut pending = FuturesUnordered::new();

        for command in commands {
            let path = command.path.clone();
            let handle = tokio::spawn(send_command(
                self.client.clone(),
                self.base.clone(),
                self.token.clone(),
                self.timeout,
                command,
            ));
            pending.push(async move { (path, handle.await) });
        }

        let mut report = BatchReport::default();
        while let Some((path, joined)) = pending.next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => Err(EffectError::Join(e.to_string())),
            };
            if let Err(e) = &result {
                warn!(path = %path, error = %e, "batch command failed");
            }
            report.outcomes.push(BatchOutcome { path, result });
        }
        report
    }
}

async fn send_command(
    client: reqwest::Client,
    base: Url,
    token: String,
    timeout: Option<Duration>,
    command: RemoteCommand,
) -> Result<Value> {
    let url = base.join(command.path.trim_start_matches('/'))?;

    let mut request = client
        .post(url.clone())
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .json(&command.payload);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(EffectError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(parse_body(&response.text().await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_into_result_collects_failures() {
        let report = BatchReport {
            outcomes: vec![
                BatchOutcome {
                    path: "a".into(),
                    result: Ok(json!(1)),
                },
                BatchOutcome {
                    path: "b".into(),
                    result: Err(EffectError::Status {
                        status: 500,
                        url: "http://x/b".into(),
                    }),
                },
            ],
        };
        assert_eq!(report.failure_count(), 1);

        match report.into_result() {
            Err(EffectError::BatchPartialFailure(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].path, "b");
            }
            other => panic!("expected partial failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let dispatcher = BatchCommandDispatcher::new("http://127.0.0.1:9", "t").unwrap();
        let report = dispatcher.dispatch(Vec::new()).await;
        assert!(report.is_empty());
        assert!(report.into_result().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_reports_request_error() {
        // Port 9 (discard) is closed on test machines
        let dispatcher = BatchCommandDispatcher::new("http://127.0.0.1:9", "t")
            .unwrap()
            .with_timeout(Some(Duration::from_secs(2)));
        let report = dispatcher
            .dispatch(vec![RemoteCommand::new("x", json!({}))])
            .await;
        assert_eq!(report.failure_count(), 1);
    }
}
