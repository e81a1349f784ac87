use crate::metrics::{Distribution, MetricsContainer};

/// Records the wall-clock time (epoch millis) of every element that passes.
///
/// The distribution's `min` is when the stage saw its first element and `max`
/// when it saw its last one.
#[derive(Clone)]
pub struct TimeMonitor {
    distribution: Distribution,
}

impl TimeMonitor {
    pub fn new(metrics: &MetricsContainer, namespace: &str, name: &str) -> Self {
        Self {
            distribution: metrics.distribution(namespace, name),
        }
    }

    pub fn record(&self) {
        self.distribution
            .update(chrono::Utc::now().timestamp_millis());
    }

    /// Record the current time and pass the element through unchanged.
    pub fn observe<T>(&self, element: T) -> T {
        self.record();
        element
    }
}
