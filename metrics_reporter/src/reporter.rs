use std::sync::Arc;

use crate::{
    backend::{NoopReporter, PrometheusReporter},
    configuration::{MetricConfiguration, ReporterConfiguration},
    registry::SharedRegistry,
    types::LabelValues,
};

/// A monotonically increasing metric.
pub trait Counter: Send + Sync {
    /// Add `value` to the series selected by `labels`.
    fn count(&self, value: f64, labels: &LabelValues<'_>);
}

/// A metric holding a current value.
pub trait Gauge: Send + Sync {
    /// Set the series selected by `labels` to `value`.
    fn set(&self, value: f64, labels: &LabelValues<'_>);
}

/// A metric recording individual observations into a distribution.
pub trait Observer: Send + Sync {
    /// Record one observation on the series selected by `labels`.
    fn observe(&self, value: f64, labels: &LabelValues<'_>);
}

/// A function sampled for a gauge's value whenever metrics are collected.
pub type GaugeFn = Box<dyn Fn() -> f64 + Send + Sync>;

/// Vends metrics by path.
///
/// Requesting a path a second time returns the handle created the first time. You should
/// still cache the handles you get: recording is lock-free, but vending takes a lock.
///
/// Vending panics when the metric cannot be created. That only happens when the
/// metrics setup is wrong: colliding const labels, the same path requested as two
/// different kinds, or a name the client rejects.
pub trait Reporter: Send + Sync {
    /// Get or create a counter.
    fn counter(&self, configuration: &MetricConfiguration) -> Arc<dyn Counter>;

    /// Get or create a gauge.
    fn gauge(&self, configuration: &MetricConfiguration) -> Arc<dyn Gauge>;

    /// Get or create a gauge whose value is read from `sample` at collection time.
    ///
    /// Label names are ignored: a function gauge has exactly one series.
    fn gauge_fn(&self, configuration: &MetricConfiguration, sample: GaugeFn);

    /// Get or create an observer with the default buckets.
    fn observer(&self, configuration: &MetricConfiguration) -> Arc<dyn Observer>;

    /// Get or create an observer with the configured buckets.
    fn histogram(&self, configuration: &MetricConfiguration) -> Arc<dyn Observer>;

    /// Forget the metric at `path`. Returns whether there was one.
    ///
    /// Handles you still hold keep working, but nothing they record is collected.
    /// Requesting the path again creates a fresh metric.
    fn unregister(&self, path: &str) -> bool;

    /// A reporter nested under this one's subsystem, sharing its namespace and const labels.
    fn subsystem_reporter(&self, subsystem: &str) -> Arc<dyn Reporter>;

    /// A short description of this reporter
    fn info(&self) -> String;
}

/// Where a reporter's metrics go.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Nowhere
    Noop,
    /// Into this prometheus registry
    Prometheus(SharedRegistry),
}

/// Create a reporter for the chosen backend.
///
/// ```
/// use metrics_reporter::{
///     new_reporter, Backend, MetricConfiguration, ReporterConfiguration, SharedRegistry,
/// };
///
/// let registry = SharedRegistry::new();
/// let reporter = new_reporter(
///     Backend::Prometheus(registry.clone()),
///     &ReporterConfiguration::new("shop"),
/// );
///
/// let orders = reporter.counter(&MetricConfiguration::new("orders_total", ["channel"]));
/// orders.count(1.0, &[("channel", "web")].into());
///
/// assert_eq!("shop_orders_total", registry.gather()[0].get_name());
/// ```
pub fn new_reporter(backend: Backend, configuration: &ReporterConfiguration) -> Arc<dyn Reporter> {
    match backend {
        Backend::Noop => Arc::new(NoopReporter),
        Backend::Prometheus(registry) => Arc::new(PrometheusReporter::new(registry, configuration)),
    }
}

#[cfg(test)]
mod test {
    use crate::{MetricConfiguration, ReporterConfiguration, SharedRegistry};

    use super::{new_reporter, Backend};

    #[test_log::test]
    fn backends_are_interchangeable() {
        let registry = SharedRegistry::new();
        let configuration = ReporterConfiguration::new("app");

        for backend in [Backend::Noop, Backend::Prometheus(registry.clone())] {
            let reporter = new_reporter(backend, &configuration);
            reporter
                .counter(&MetricConfiguration::new("hits", ["page"]))
                .count(1.0, &[("page", "home")].into());
            reporter
                .gauge(&"temperature".into())
                .set(21.5, &Default::default());
            reporter
                .observer(&MetricConfiguration::new("latency", ["route"]))
                .observe(0.25, &[("route", "/")].into());
        }

        let mut names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_owned())
            .collect();
        names.sort();
        assert_eq!(vec!["app_hits", "app_latency", "app_temperature"], names);
    }

    #[test_log::test]
    fn info_describes_the_backend() {
        let configuration = ReporterConfiguration::new("app");

        assert_eq!("", new_reporter(Backend::Noop, &configuration).info());
        assert_eq!(
            "prometheus namespace=app",
            new_reporter(Backend::Prometheus(SharedRegistry::new()), &configuration).info()
        );
    }
}
