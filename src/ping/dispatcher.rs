//! Ping dispatcher: bounded retries with host failover.
//!
//! # State Machine
//! ```text
//! START → ATTEMPT × up to max_attempts → SUCCESS | EXHAUSTED | TRANSPORT_FAILED → DONE
//! ```
//! Every path into DONE releases the completion signal exactly once.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::task::JoinHandle;
use url::Url;

use crate::config::AgentConfig;
use crate::ping::completion::CompletionSignal;
use crate::ping::hosts::HostPolicy;
use crate::ping::request::PingRequest;
use crate::ping::{AttemptRecord, AttemptResult, DispatchStatus, PingError, PingReport};
use crate::resilience::RetryPolicy;

/// `User-Agent` sent with every ping.
pub fn user_agent() -> String {
    format!("CronitorAgent/{}", env!("CARGO_PKG_VERSION"))
}

/// Delivers pings. Holds an immutable snapshot of the configuration it was
/// built from; share it across tasks through `Arc<Dispatcher>`.
#[derive(Debug)]
pub struct Dispatcher {
    client: Client,
    hosts: HostPolicy,
    retry: RetryPolicy,
    verbose: bool,
}

impl Dispatcher {
    pub fn new(config: &AgentConfig) -> Result<Self, PingError> {
        let mut builder = Client::builder()
            .user_agent(user_agent())
            .timeout(Duration::from_secs(config.ping.timeout_secs));
        if !config.ping.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            hosts: HostPolicy::from_config(config)?,
            retry: RetryPolicy::from(&config.ping),
            verbose: config.verbose,
        })
    }

    pub fn hosts(&self) -> &HostPolicy {
        &self.hosts
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Deliver `request` and release `completion`, whatever the outcome.
    pub async fn dispatch(&self, request: &PingRequest, completion: CompletionSignal) -> PingReport {
        let report = self.deliver(request).await;
        completion.done();
        report
    }

    /// Run `dispatch` as an independent task.
    pub fn spawn(
        self: &Arc<Self>,
        request: PingRequest,
        completion: CompletionSignal,
    ) -> JoinHandle<PingReport> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move { dispatcher.dispatch(&request, completion).await })
    }

    async fn deliver(&self, request: &PingRequest) -> PingReport {
        let mut attempts = Vec::new();
        let mut status = DispatchStatus::Exhausted;

        for number in 1..=self.retry.max_attempts {
            let delay = self.retry.delay_before(number);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let host = self.hosts.select(number);
            let uri = match request.uri(host, number) {
                Ok(uri) => uri,
                Err(error) => {
                    // Hosts are validated up front; only a hand-built policy gets here.
                    tracing::error!(monitor = request.monitor(), error = %error, "Failed to build ping URI");
                    status = DispatchStatus::InvalidUri;
                    break;
                }
            };

            if self.verbose {
                tracing::info!(attempt = number, uri = %uri, "Sending ping");
            } else {
                tracing::debug!(attempt = number, uri = %uri, "Sending ping");
            }

            let result = self.attempt(&uri).await;
            let outcome = result.clone();
            attempts.push(AttemptRecord {
                number,
                host: host.clone(),
                uri,
                result,
            });

            match outcome {
                AttemptResult::Success { status: code } => {
                    tracing::debug!(attempt = number, status = code, "Ping delivered");
                    status = DispatchStatus::Delivered;
                    break;
                }
                AttemptResult::Transport { error } => {
                    tracing::error!(
                        monitor = request.monitor(),
                        event = %request.kind(),
                        attempt = number,
                        error = %error,
                        "Ping request failed"
                    );
                    if self.retry.aborts_on_transport_error() {
                        status = DispatchStatus::TransportFailed;
                        break;
                    }
                }
                AttemptResult::Status { status: code } => {
                    tracing::debug!(attempt = number, status = code, "Ping rejected, retrying");
                }
                AttemptResult::Body { status: code, error } => {
                    tracing::debug!(attempt = number, status = code, error = %error, "Ping body read failed, retrying");
                }
            }
        }

        if status == DispatchStatus::Exhausted {
            if self.verbose {
                tracing::info!(
                    monitor = request.monitor(),
                    event = %request.kind(),
                    attempts = attempts.len(),
                    "Ping not delivered"
                );
            } else {
                tracing::debug!(
                    monitor = request.monitor(),
                    event = %request.kind(),
                    attempts = attempts.len(),
                    "Ping not delivered"
                );
            }
        }

        PingReport {
            monitor: request.monitor().to_string(),
            kind: request.kind(),
            attempts,
            status,
        }
    }

    async fn attempt(&self, uri: &Url) -> AttemptResult {
        let response = match self.client.get(uri.clone()).send().await {
            Ok(response) => response,
            Err(error) => {
                return AttemptResult::Transport {
                    error: error.to_string(),
                }
            }
        };

        let status = response.status().as_u16();
        // Drain the body so the connection can be reused.
        match response.bytes().await {
            Ok(_) if status < 400 => AttemptResult::Success { status },
            Ok(_) => AttemptResult::Status { status },
            Err(error) => AttemptResult::Body {
                status,
                error: error.to_string(),
            },
        }
    }
}
