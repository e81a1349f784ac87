//! Pipeline submission and the handle used to wait on, cancel and inspect a run.

use crate::error::PipelineError;
use crate::metrics::{MetricResults, MetricsContainer};
use crate::state::PipelineState;
use std::future::Future;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How long `cancel` waits for the body to stop before aborting the task.
const CANCEL_GRACE: Duration = Duration::from_secs(5);

/// Context handed to a running pipeline body.
#[derive(Clone)]
pub struct PipelineContext {
    name: String,
    metrics: MetricsContainer,
    cancel: CancellationToken,
}

impl PipelineContext {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &MetricsContainer {
        &self.metrics
    }

    /// Token that fires when the run is cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A named pipeline ready to be submitted.
pub struct Pipeline {
    name: String,
    metrics: MetricsContainer,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: MetricsContainer::new(),
        }
    }

    /// Submit the pipeline body to the runtime.
    ///
    /// The body is spawned immediately; the returned handle is the only way to
    /// observe it. A run cancelled before the runtime first polls it never
    /// executes its body.
    pub fn run<T, F, Fut>(self, body: F) -> PipelineResult<T>
    where
        T: Send + 'static,
        F: FnOnce(PipelineContext) -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let context = PipelineContext {
            name: self.name.clone(),
            metrics: self.metrics.clone(),
            cancel: cancel.clone(),
        };
        let work = body(context);
        let token = cancel.clone();

        info!("Starting pipeline '{}'", self.name);

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => RunOutcome::Cancelled,
                result = work => match result {
                    Ok(output) => RunOutcome::Done(output),
                    Err(e) => RunOutcome::Failed(format!("{e:#}")),
                },
            }
        });

        PipelineResult {
            name: self.name,
            handle: Some(handle),
            cancel,
            state: PipelineState::Running,
            output: None,
            error: None,
            metrics: self.metrics,
        }
    }
}

enum RunOutcome<T> {
    Done(T),
    Failed(String),
    Cancelled,
}

/// Handle to a submitted pipeline.
///
/// Dropping a handle whose run has not finished cancels the run.
pub struct PipelineResult<T> {
    name: String,
    handle: Option<JoinHandle<RunOutcome<T>>>,
    cancel: CancellationToken,
    state: PipelineState,
    output: Option<T>,
    error: Option<String>,
    metrics: MetricsContainer,
}

impl<T> PipelineResult<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last observed state. Only changes inside `wait_*` and `cancel`.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Error message of a failed run.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn output(&self) -> Option<&T> {
        self.output.as_ref()
    }

    /// Snapshot of the metrics recorded so far.
    pub fn metrics(&self) -> MetricResults {
        self.metrics.snapshot()
    }

    /// Wait without bound for the run to reach a terminal state.
    pub async fn wait_until_finish(&mut self) -> PipelineState {
        if let Some(handle) = self.handle.as_mut() {
            let joined = handle.await;
            self.handle = None;
            self.complete(joined);
        }
        self.state
    }

    /// Wait at most `timeout` for a terminal state.
    ///
    /// Returns `None` when the run is still going; it is left running and the
    /// caller decides whether to cancel it.
    pub async fn wait_until_finish_timeout(&mut self, timeout: Duration) -> Option<PipelineState> {
        let Some(handle) = self.handle.as_mut() else {
            return Some(self.state);
        };

        match tokio::time::timeout(timeout, handle).await {
            Ok(joined) => {
                self.handle = None;
                self.complete(joined);
                Some(self.state)
            }
            Err(_) => {
                debug!(
                    "Pipeline '{}' did not finish within {:?}",
                    self.name, timeout
                );
                None
            }
        }
    }

    /// Request cancellation and wait for the run to stop.
    ///
    /// Cancellation is cooperative: the body is dropped at its next await
    /// point. A body that does not yield within the grace period is aborted.
    pub async fn cancel(&mut self) -> PipelineState {
        let Some(mut handle) = self.handle.take() else {
            return self.state;
        };

        info!("Cancelling pipeline '{}'", self.name);
        self.cancel.cancel();

        match tokio::time::timeout(CANCEL_GRACE, &mut handle).await {
            Ok(joined) => self.complete(joined),
            Err(_) => {
                warn!(
                    "Pipeline '{}' ignored cancellation for {:?}, aborting",
                    self.name, CANCEL_GRACE
                );
                handle.abort();
                self.state = PipelineState::Cancelled;
            }
        }
        self.state
    }

    /// Consume the handle and return the output of a successful run.
    pub fn into_output(mut self) -> Result<T, PipelineError> {
        match self.state {
            PipelineState::Done => self
                .output
                .take()
                .ok_or_else(|| PipelineError::NotFinished(self.name.clone())),
            PipelineState::Failed => Err(PipelineError::Failed {
                pipeline: self.name.clone(),
                message: self.error.take().unwrap_or_default(),
            }),
            PipelineState::Cancelled => Err(PipelineError::Cancelled(self.name.clone())),
            PipelineState::Running => Err(PipelineError::NotFinished(self.name.clone())),
        }
    }

    fn complete(&mut self, joined: Result<RunOutcome<T>, JoinError>) {
        match joined {
            Ok(RunOutcome::Done(output)) => {
                self.state = PipelineState::Done;
                self.output = Some(output);
            }
            Ok(RunOutcome::Failed(message)) => {
                warn!("Pipeline '{}' failed: {}", self.name, message);
                self.state = PipelineState::Failed;
                self.error = Some(message);
            }
            Ok(RunOutcome::Cancelled) => {
                self.state = PipelineState::Cancelled;
            }
            Err(e) if e.is_cancelled() => {
                self.state = PipelineState::Cancelled;
            }
            Err(e) => {
                warn!("Pipeline '{}' task error: {}", self.name, e);
                self.state = PipelineState::Failed;
                self.error = Some(e.to_string());
            }
        }
        info!("Pipeline '{}' finished: {}", self.name, self.state);
    }
}

impl<T> Drop for PipelineResult<T> {
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            self.cancel.cancel();
        }
    }
}

/// Cancel the run when a bounded wait did not observe a terminal state.
///
/// A timed-out run is not an error by itself; whatever the caller asserts
/// afterwards decides pass/fail.
pub async fn cancel_if_timed_out<T>(
    result: &mut PipelineResult<T>,
    state: Option<PipelineState>,
) -> PipelineState {
    match state {
        Some(state) => state,
        None => {
            warn!(
                "Pipeline '{}' timed out without a terminal state, cancelling",
                result.name()
            );
            result.cancel().await
        }
    }
}
