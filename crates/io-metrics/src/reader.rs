use pipeline::MetricResults;

/// Read access to one namespace of a run's metrics.
///
/// Missing metrics are reported as `-1` rather than as errors, so a stage that
/// saw no elements still yields a (meaningless but visible) result.
pub struct MetricsReader<'a> {
    results: &'a MetricResults,
    namespace: String,
}

impl<'a> MetricsReader<'a> {
    pub fn new(results: &'a MetricResults, namespace: impl Into<String>) -> Self {
        Self {
            results,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn counter(&self, name: &str) -> i64 {
        self.results.counter(&self.namespace, name).unwrap_or(-1)
    }

    /// Earliest timestamp (epoch millis) recorded into `name`.
    pub fn start_time(&self, name: &str) -> i64 {
        self.results
            .distribution(&self.namespace, name)
            .map_or(-1, |d| d.min)
    }

    /// Latest timestamp (epoch millis) recorded into `name`.
    pub fn end_time(&self, name: &str) -> i64 {
        self.results
            .distribution(&self.namespace, name)
            .map_or(-1, |d| d.max)
    }
}
