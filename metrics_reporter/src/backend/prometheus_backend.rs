use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use prometheus::{
    core::{Collector, Desc},
    proto::MetricFamily,
    CounterVec, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry,
};

use crate::{
    configuration::{MetricConfiguration, ReporterConfiguration},
    error::ReporterError,
    labels::merge_labels,
    registry::{Registration, SharedRegistry},
    reporter::{Counter, Gauge, GaugeFn, Observer, Reporter},
    types::{ConstLabels, LabelValues, MetricKind, Name},
};

/// A reporter that creates and registers metrics in a prometheus [`Registry`], through a
/// [`SharedRegistry`].
///
/// Metric names are `namespace_subsystem_path`, with empty parts left out. Every metric
/// carries the reporter's const labels plus its own.
///
/// The registry is yours: gather and encode it however you serve metrics.
/// ```
/// use metrics_reporter::{
///     MetricConfiguration, PrometheusReporter, Reporter, ReporterConfiguration, SharedRegistry,
/// };
/// use prometheus::{Encoder, TextEncoder};
///
/// let mut configuration = ReporterConfiguration::new("shop");
/// configuration.const_label("region", "us-east");
/// let reporter = PrometheusReporter::new(SharedRegistry::new(), &configuration);
///
/// let latency = reporter.observer(&MetricConfiguration::new("request_seconds", ["route"]));
/// latency.observe(0.042, &[("route", "/cart")].into());
///
/// let mut exposition = Vec::new();
/// TextEncoder::new()
///     .encode(&reporter.registry().gather(), &mut exposition)
///     .expect("text encoding should work");
/// assert!(String::from_utf8_lossy(&exposition).contains("shop_request_seconds_count"));
/// ```
pub struct PrometheusReporter {
    registry: SharedRegistry,
    namespace: Name,
    subsystem: Name,
    const_labels: ConstLabels,
    metrics: Mutex<HashMap<Name, Metric>>,
}

/// A counter vended by a [`PrometheusReporter`]
#[derive(Clone)]
pub struct PrometheusCounter {
    path: Name,
    counter: CounterVec,
}

/// A gauge vended by a [`PrometheusReporter`]
#[derive(Clone)]
pub struct PrometheusGauge {
    path: Name,
    gauge: GaugeVec,
}

/// An observer vended by a [`PrometheusReporter`]. Observations go into a histogram.
#[derive(Clone)]
pub struct PrometheusObserver {
    path: Name,
    histogram: HistogramVec,
}

/// A gauge that is set from its sample function right before it is collected.
#[derive(Clone)]
struct SampledGauge {
    gauge: prometheus::Gauge,
    sample: Arc<GaugeFn>,
}

impl Collector for SampledGauge {
    fn desc(&self) -> Vec<&Desc> {
        self.gauge.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.gauge.set((self.sample.as_ref())());
        self.gauge.collect()
    }
}

/// What the cache holds per path
#[derive(Clone)]
enum Metric {
    Counter(Arc<PrometheusCounter>),
    Gauge(Arc<PrometheusGauge>),
    GaugeFn(SampledGauge),
    Observer(Arc<PrometheusObserver>),
    Histogram(Arc<PrometheusObserver>),
}

impl Metric {
    fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::GaugeFn(_) => MetricKind::GaugeFn,
            Metric::Observer(_) => MetricKind::Observer,
            Metric::Histogram(_) => MetricKind::Histogram,
        }
    }

    /// A registry-side handle; prometheus metrics are clones of shared state.
    fn collector(&self) -> Box<dyn Collector> {
        match self {
            Metric::Counter(counter) => Box::new(counter.counter.clone()),
            Metric::Gauge(gauge) => Box::new(gauge.gauge.clone()),
            Metric::GaugeFn(gauge) => Box::new(gauge.clone()),
            Metric::Observer(observer) | Metric::Histogram(observer) => {
                Box::new(observer.histogram.clone())
            }
        }
    }
}

impl PrometheusReporter {
    /// Create a reporter that registers its metrics in `registry`.
    ///
    /// Reporters that register into the same prometheus registry should be given clones
    /// of one [`SharedRegistry`], so conflicting registrations between them are caught.
    pub fn new(registry: impl Into<SharedRegistry>, configuration: &ReporterConfiguration) -> Self {
        Self {
            registry: registry.into(),
            namespace: configuration.system.clone(),
            subsystem: configuration.subsystem.clone(),
            const_labels: configuration.const_labels.clone(),
            metrics: Default::default(),
        }
    }

    /// The registry this reporter registers into
    pub fn registry(&self) -> &Registry {
        self.registry.registry()
    }

    /// A reporter with the same registry, namespace and const labels, whose subsystem is
    /// this reporter's subsystem joined to `subsystem` with `_`.
    ///
    /// The child keeps its own cache: a path is vended once per reporter.
    pub fn child(&self, subsystem: &str) -> PrometheusReporter {
        let subsystem: Name = if subsystem.is_empty() {
            self.subsystem.clone()
        } else if self.subsystem.is_empty() {
            subsystem.to_owned().into()
        } else {
            format!("{}_{subsystem}", self.subsystem).into()
        };
        Self {
            registry: self.registry.clone(),
            namespace: self.namespace.clone(),
            subsystem,
            const_labels: self.const_labels.clone(),
            metrics: Default::default(),
        }
    }

    /// Get or create a counter, reporting configuration problems instead of panicking.
    pub fn try_counter(
        &self,
        configuration: &MetricConfiguration,
    ) -> Result<Arc<PrometheusCounter>, ReporterError> {
        self.get_or_create(
            configuration,
            MetricKind::Counter,
            |metric| match metric {
                Metric::Counter(counter) => Some(counter.clone()),
                _ => None,
            },
            Metric::Counter,
            |opts| {
                Ok(Arc::new(PrometheusCounter {
                    path: configuration.path.clone(),
                    counter: CounterVec::new(opts, &configuration.label_names())?,
                }))
            },
        )
    }

    /// Get or create a gauge, reporting configuration problems instead of panicking.
    pub fn try_gauge(
        &self,
        configuration: &MetricConfiguration,
    ) -> Result<Arc<PrometheusGauge>, ReporterError> {
        self.get_or_create(
            configuration,
            MetricKind::Gauge,
            |metric| match metric {
                Metric::Gauge(gauge) => Some(gauge.clone()),
                _ => None,
            },
            Metric::Gauge,
            |opts| {
                Ok(Arc::new(PrometheusGauge {
                    path: configuration.path.clone(),
                    gauge: GaugeVec::new(opts, &configuration.label_names())?,
                }))
            },
        )
    }

    /// Get or create a function gauge, reporting configuration problems instead of panicking.
    ///
    /// When the path already holds a function gauge, `sample` is dropped and the first one stays.
    pub fn try_gauge_fn(
        &self,
        configuration: &MetricConfiguration,
        sample: GaugeFn,
    ) -> Result<(), ReporterError> {
        self.get_or_create(
            configuration,
            MetricKind::GaugeFn,
            |metric| match metric {
                Metric::GaugeFn(gauge) => Some(gauge.clone()),
                _ => None,
            },
            Metric::GaugeFn,
            |opts| {
                Ok(SampledGauge {
                    gauge: prometheus::Gauge::with_opts(opts)?,
                    sample: Arc::new(sample),
                })
            },
        )
        .map(|_| ())
    }

    /// Get or create an observer with the default buckets, reporting configuration problems
    /// instead of panicking.
    pub fn try_observer(
        &self,
        configuration: &MetricConfiguration,
    ) -> Result<Arc<PrometheusObserver>, ReporterError> {
        self.get_or_create(
            configuration,
            MetricKind::Observer,
            cached_observer,
            Metric::Observer,
            |opts| {
                Ok(Arc::new(PrometheusObserver {
                    path: configuration.path.clone(),
                    histogram: HistogramVec::new(
                        histogram_opts(opts, None),
                        &configuration.label_names(),
                    )?,
                }))
            },
        )
    }

    /// Get or create an observer with the configured buckets, reporting configuration problems
    /// instead of panicking.
    ///
    /// A path already holding an observer returns that observer, with its buckets.
    pub fn try_histogram(
        &self,
        configuration: &MetricConfiguration,
    ) -> Result<Arc<PrometheusObserver>, ReporterError> {
        self.get_or_create(
            configuration,
            MetricKind::Histogram,
            cached_observer,
            Metric::Histogram,
            |opts| {
                Ok(Arc::new(PrometheusObserver {
                    path: configuration.path.clone(),
                    histogram: HistogramVec::new(
                        histogram_opts(opts, configuration.buckets.as_deref()),
                        &configuration.label_names(),
                    )?,
                }))
            },
        )
    }

    fn get_or_create<T: Clone>(
        &self,
        configuration: &MetricConfiguration,
        kind: MetricKind,
        cached: fn(&Metric) -> Option<T>,
        wrap: impl FnOnce(T) -> Metric,
        create: impl FnOnce(Opts) -> prometheus::Result<T>,
    ) -> Result<T, ReporterError> {
        let mut metrics = self.lock_metrics();
        if let Some(metric) = metrics.get(&configuration.path) {
            return cached(metric).ok_or_else(|| ReporterError::KindMismatch {
                path: configuration.path.clone(),
                existing: metric.kind(),
                requested: kind,
            });
        }

        let handle = create(self.opts(configuration)?)
            .map_err(|source| client_error(configuration, source))?;
        let metric = wrap(handle.clone());
        self.register(configuration, metric.collector())?;
        log::debug!("created {kind} {}", configuration.path);
        metrics.insert(configuration.path.clone(), metric);

        Ok(handle)
    }

    fn opts(&self, configuration: &MetricConfiguration) -> Result<Opts, ReporterError> {
        Ok(
            Opts::new(configuration.path.as_str(), configuration.help_text())
                .namespace(self.namespace.as_str())
                .subsystem(self.subsystem.as_str())
                .const_labels(merge_labels(
                    &self.const_labels,
                    &configuration.const_labels,
                )?),
        )
    }

    fn register(
        &self,
        configuration: &MetricConfiguration,
        collector: Box<dyn Collector>,
    ) -> Result<(), ReporterError> {
        match self.registry.register(collector) {
            Ok(Registration::Registered) => Ok(()),
            Ok(Registration::AlreadyRegistered) => {
                log::debug!("{} was already registered", configuration.path);
                Ok(())
            }
            Err(source) => Err(client_error(configuration, source)),
        }
    }

    fn lock_metrics(&self) -> MutexGuard<'_, HashMap<Name, Metric>> {
        // The map is never left half-updated, so a panic elsewhere does not invalidate it.
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Observers and histograms are both observers: either one is vended for the other.
fn cached_observer(metric: &Metric) -> Option<Arc<PrometheusObserver>> {
    match metric {
        Metric::Observer(observer) | Metric::Histogram(observer) => Some(observer.clone()),
        _ => None,
    }
}

fn histogram_opts(opts: Opts, buckets: Option<&[f64]>) -> HistogramOpts {
    HistogramOpts {
        common_opts: opts,
        buckets: buckets.unwrap_or(&prometheus::DEFAULT_BUCKETS[..]).to_vec(),
    }
}

fn client_error(configuration: &MetricConfiguration, source: prometheus::Error) -> ReporterError {
    ReporterError::Client {
        path: configuration.path.clone(),
        source,
    }
}

fn fatal(error: ReporterError) -> ! {
    log::error!("metrics setup is broken: {error}");
    panic!("{error}")
}

impl Reporter for PrometheusReporter {
    fn counter(&self, configuration: &MetricConfiguration) -> Arc<dyn Counter> {
        self.try_counter(configuration)
            .unwrap_or_else(|error| fatal(error))
    }

    fn gauge(&self, configuration: &MetricConfiguration) -> Arc<dyn Gauge> {
        self.try_gauge(configuration)
            .unwrap_or_else(|error| fatal(error))
    }

    fn gauge_fn(&self, configuration: &MetricConfiguration, sample: GaugeFn) {
        self.try_gauge_fn(configuration, sample)
            .unwrap_or_else(|error| fatal(error))
    }

    fn observer(&self, configuration: &MetricConfiguration) -> Arc<dyn Observer> {
        self.try_observer(configuration)
            .unwrap_or_else(|error| fatal(error))
    }

    fn histogram(&self, configuration: &MetricConfiguration) -> Arc<dyn Observer> {
        self.try_histogram(configuration)
            .unwrap_or_else(|error| fatal(error))
    }

    fn unregister(&self, path: &str) -> bool {
        let mut metrics = self.lock_metrics();
        match metrics.remove(path) {
            Some(metric) => {
                if let Err(e) = self.registry.unregister(metric.collector()) {
                    log::debug!("{path} was not in the registry: {e}");
                }
                log::debug!("unregistered {} {path}", metric.kind());
                true
            }
            None => false,
        }
    }

    fn subsystem_reporter(&self, subsystem: &str) -> Arc<dyn Reporter> {
        Arc::new(self.child(subsystem))
    }

    fn info(&self) -> String {
        if self.subsystem.is_empty() {
            format!("prometheus namespace={}", self.namespace)
        } else {
            format!(
                "prometheus namespace={} subsystem={}",
                self.namespace, self.subsystem
            )
        }
    }
}

impl Counter for PrometheusCounter {
    fn count(&self, value: f64, labels: &LabelValues<'_>) {
        if value.is_nan() || value < 0.0 {
            log::warn!("dropping count {value} for {}: counters only increase", self.path);
            return;
        }
        match self.counter.get_metric_with(labels) {
            Ok(counter) => counter.inc_by(value),
            Err(e) => log::warn!("dropping count for {}: {e}", self.path),
        }
    }
}

impl Gauge for PrometheusGauge {
    fn set(&self, value: f64, labels: &LabelValues<'_>) {
        match self.gauge.get_metric_with(labels) {
            Ok(gauge) => gauge.set(value),
            Err(e) => log::warn!("dropping gauge value for {}: {e}", self.path),
        }
    }
}

impl Observer for PrometheusObserver {
    fn observe(&self, value: f64, labels: &LabelValues<'_>) {
        match self.histogram.get_metric_with(labels) {
            Ok(histogram) => histogram.observe(value),
            Err(e) => log::warn!("dropping observation for {}: {e}", self.path),
        }
    }
}
