//! Spawn a batch of pings and collect their reports.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::ping::completion::CompletionCounter;
use crate::ping::dispatcher::Dispatcher;
use crate::ping::request::PingRequest;
use crate::ping::PingReport;

/// A set of in-flight dispatches sharing one completion counter.
pub struct PingGroup {
    dispatcher: Arc<Dispatcher>,
    completion: CompletionCounter,
    tasks: JoinSet<PingReport>,
}

impl PingGroup {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            completion: CompletionCounter::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Start delivering `request` in the background.
    pub fn spawn(&mut self, request: PingRequest) {
        let signal = self.completion.signal();
        let dispatcher = Arc::clone(&self.dispatcher);
        self.tasks
            .spawn(async move { dispatcher.dispatch(&request, signal).await });
    }

    /// Dispatches that have not reached a terminal state yet.
    pub fn pending(&self) -> usize {
        self.completion.pending()
    }

    /// Handle for waiting on this group without consuming it.
    pub fn completion(&self) -> CompletionCounter {
        self.completion.clone()
    }

    /// Wait for every dispatch and return the reports in completion order.
    pub async fn wait(mut self) -> Vec<PingReport> {
        let mut reports = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!(error = %e, "Ping task failed"),
            }
        }
        reports
    }
}
