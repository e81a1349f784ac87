//! Pipeline-scoped metrics: counters and distributions.
//!
//! Handles are cheap to clone and safe to update from any task. Values are only
//! read through a [`MetricResults`] snapshot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Fully qualified metric name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricName {
    pub namespace: String,
    pub name: String,
}

impl MetricName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

/// Summary of the values recorded into a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionResult {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
}

impl DistributionResult {
    fn empty() -> Self {
        Self {
            count: 0,
            sum: 0,
            min: i64::MAX,
            max: i64::MIN,
        }
    }

    fn update(&mut self, value: i64) {
        self.count += 1;
        self.sum = self.sum.wrapping_add(value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }
}

#[derive(Default)]
struct Registry {
    counters: HashMap<MetricName, Arc<AtomicI64>>,
    distributions: HashMap<MetricName, Arc<Mutex<DistributionResult>>>,
}

/// Store for all metrics recorded by one pipeline run.
#[derive(Clone, Default)]
pub struct MetricsContainer {
    registry: Arc<Mutex<Registry>>,
}

impl MetricsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get or create a counter.
    pub fn counter(&self, namespace: &str, name: &str) -> Counter {
        let cell = self
            .registry()
            .counters
            .entry(MetricName::new(namespace, name))
            .or_default()
            .clone();
        Counter { cell }
    }

    /// Get or create a distribution.
    pub fn distribution(&self, namespace: &str, name: &str) -> Distribution {
        let cell = self
            .registry()
            .distributions
            .entry(MetricName::new(namespace, name))
            .or_insert_with(|| Arc::new(Mutex::new(DistributionResult::empty())))
            .clone();
        Distribution { cell }
    }

    /// Take a point-in-time copy of every metric.
    pub fn snapshot(&self) -> MetricResults {
        let registry = self.registry();
        let counters = registry
            .counters
            .iter()
            .map(|(k, v)| (k.clone(), v.load(Ordering::SeqCst)))
            .collect();
        let distributions = registry
            .distributions
            .iter()
            .filter_map(|(k, v)| {
                let d = *v.lock().unwrap_or_else(|e| e.into_inner());
                (d.count > 0).then(|| (k.clone(), d))
            })
            .collect();
        MetricResults {
            counters,
            distributions,
        }
    }
}

/// Increment-only counter.
#[derive(Clone)]
pub struct Counter {
    cell: Arc<AtomicI64>,
}

impl Counter {
    pub fn inc(&self) {
        self.inc_by(1);
    }

    pub fn inc_by(&self, n: i64) {
        self.cell.fetch_add(n, Ordering::SeqCst);
    }

    pub fn get(&self) -> i64 {
        self.cell.load(Ordering::SeqCst)
    }
}

/// Distribution of integer samples.
#[derive(Clone)]
pub struct Distribution {
    cell: Arc<Mutex<DistributionResult>>,
}

impl Distribution {
    pub fn update(&self, value: i64) {
        self.cell
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .update(value);
    }
}

/// Immutable snapshot of a run's metrics.
#[derive(Debug, Clone, Default)]
pub struct MetricResults {
    counters: HashMap<MetricName, i64>,
    distributions: HashMap<MetricName, DistributionResult>,
}

impl MetricResults {
    pub fn counter(&self, namespace: &str, name: &str) -> Option<i64> {
        self.counters
            .get(&MetricName::new(namespace, name))
            .copied()
    }

    /// Distributions that never received a sample are not reported.
    pub fn distribution(&self, namespace: &str, name: &str) -> Option<DistributionResult> {
        self.distributions
            .get(&MetricName::new(namespace, name))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_shared_between_handles() {
        let metrics = MetricsContainer::new();
        let a = metrics.counter("ns", "elements");
        let b = metrics.counter("ns", "elements");

        a.inc();
        b.inc_by(4);

        assert_eq!(a.get(), 5);
        assert_eq!(metrics.snapshot().counter("ns", "elements"), Some(5));
    }

    #[test]
    fn test_counters_are_namespaced() {
        let metrics = MetricsContainer::new();
        metrics.counter("a", "x").inc();
        metrics.counter("b", "x").inc_by(2);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.counter("a", "x"), Some(1));
        assert_eq!(snapshot.counter("b", "x"), Some(2));
        assert_eq!(snapshot.counter("c", "x"), None);
    }

    #[test]
    fn test_distribution_min_max() {
        let metrics = MetricsContainer::new();
        let dist = metrics.distribution("ns", "time");
        for v in [30, 10, 20] {
            dist.update(v);
        }

        let result = metrics.snapshot().distribution("ns", "time").unwrap();
        assert_eq!(result.count, 3);
        assert_eq!(result.min, 10);
        assert_eq!(result.max, 30);
        assert_eq!(result.mean(), Some(20.0));
    }

    #[test]
    fn test_empty_distribution_not_reported() {
        let metrics = MetricsContainer::new();
        let _ = metrics.distribution("ns", "time");
        assert!(metrics.snapshot().distribution("ns", "time").is_none());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let metrics = MetricsContainer::new();
        let counter = metrics.counter("ns", "n");
        counter.inc();
        let snapshot = metrics.snapshot();
        counter.inc();

        assert_eq!(snapshot.counter("ns", "n"), Some(1));
        assert_eq!(metrics.snapshot().counter("ns", "n"), Some(2));
    }
}
