use std::sync::Arc;

use crate::{
    configuration::MetricConfiguration,
    reporter::{Counter, Gauge, GaugeFn, Observer, Reporter},
    types::LabelValues,
};

/// A reporter that vends metrics which record nothing.
///
/// Use it where a reporter is required but metrics are not wanted, like tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

/// A counter that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCounter;

/// A gauge that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGauge;

/// An observer that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Reporter for NoopReporter {
    fn counter(&self, _configuration: &MetricConfiguration) -> Arc<dyn Counter> {
        Arc::new(NoopCounter)
    }

    fn gauge(&self, _configuration: &MetricConfiguration) -> Arc<dyn Gauge> {
        Arc::new(NoopGauge)
    }

    fn gauge_fn(&self, _configuration: &MetricConfiguration, _sample: GaugeFn) {}

    fn observer(&self, _configuration: &MetricConfiguration) -> Arc<dyn Observer> {
        Arc::new(NoopObserver)
    }

    fn histogram(&self, _configuration: &MetricConfiguration) -> Arc<dyn Observer> {
        Arc::new(NoopObserver)
    }

    fn unregister(&self, _path: &str) -> bool {
        false
    }

    fn subsystem_reporter(&self, _subsystem: &str) -> Arc<dyn Reporter> {
        Arc::new(NoopReporter)
    }

    fn info(&self) -> String {
        String::new()
    }
}

impl Counter for NoopCounter {
    #[inline]
    fn count(&self, _value: f64, _labels: &LabelValues<'_>) {}
}

impl Gauge for NoopGauge {
    #[inline]
    fn set(&self, _value: f64, _labels: &LabelValues<'_>) {}
}

impl Observer for NoopObserver {
    #[inline]
    fn observe(&self, _value: f64, _labels: &LabelValues<'_>) {}
}
