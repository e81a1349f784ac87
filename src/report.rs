//! Scenario reports.

use io_metrics::NamedTestResult;
use std::time::Duration;

/// Outcome of one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario: String,
    /// Topic the scenario wrote to and read from.
    pub topic: String,
    pub status: TestStatus,
    pub checks: Vec<CheckResult>,
    /// Timing results (published or not).
    pub metrics: Vec<NamedTestResult>,
    pub duration: Duration,
    pub errors: Vec<String>,
}

/// One expected-versus-actual comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// Overall scenario status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    /// Scenario is still running.
    Running,
    /// Every check passed.
    Passed,
    /// At least one check failed.
    Failed,
    /// The scenario could not run to its checks.
    Error,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Running => "RUNNING",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

impl ScenarioReport {
    pub fn new(scenario: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            topic: topic.into(),
            status: TestStatus::Running,
            checks: Vec::new(),
            metrics: Vec::new(),
            duration: Duration::ZERO,
            errors: Vec::new(),
        }
    }

    /// Record a comparison and return whether it passed.
    pub fn check<E, A>(&mut self, name: &str, expected: E, actual: A) -> bool
    where
        E: std::fmt::Debug + PartialEq<A>,
        A: std::fmt::Debug,
    {
        let passed = expected == actual;
        if passed {
            tracing::info!("[{}] {name}: {actual:?}", self.scenario);
        } else {
            tracing::error!(
                "[{}] {name}: expected {expected:?}, got {actual:?}",
                self.scenario
            );
        }
        self.checks.push(CheckResult {
            name: name.to_string(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
            passed,
        });
        passed
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Settle the status from checks and errors.
    pub fn finish(&mut self, duration: Duration) {
        self.duration = duration;
        self.status = if !self.errors.is_empty() {
            TestStatus::Error
        } else if self.checks.iter().all(|c| c.passed) {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };
    }

    pub fn passed(&self) -> bool {
        matches!(self.status, TestStatus::Passed)
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Scenario '{}': {}\n\
             Topic: {}\n\
             Duration: {:?}\n",
            self.scenario, self.status, self.topic, self.duration
        );

        for check in &self.checks {
            let mark = if check.passed { "ok" } else { "FAILED" };
            summary.push_str(&format!(
                "- {} [{mark}] expected {}, actual {}\n",
                check.name, check.expected, check.actual
            ));
        }

        for metric in &self.metrics {
            summary.push_str(&format!("- {} = {:.3}s\n", metric.metric, metric.value));
        }

        if !self.errors.is_empty() {
            summary.push_str("Errors:\n");
            for error in &self.errors {
                summary.push_str(&format!("- {error}\n"));
            }
        }
        summary
    }
}
