/// Execution state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Submitted and still executing.
    Running,
    /// Completed successfully.
    Done,
    /// The body returned an error or the task died.
    Failed,
    /// Stopped on request.
    Cancelled,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineState::Running)
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineState::Running => write!(f, "RUNNING"),
            PipelineState::Done => write!(f, "DONE"),
            PipelineState::Failed => write!(f, "FAILED"),
            PipelineState::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_running_is_not_terminal() {
        assert!(!PipelineState::Running.is_terminal());
        assert!(PipelineState::Done.is_terminal());
        assert!(PipelineState::Failed.is_terminal());
        assert!(PipelineState::Cancelled.is_terminal());
    }
}
