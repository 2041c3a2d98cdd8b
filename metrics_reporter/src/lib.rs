//! One reporting interface for counters, gauges and observers, with a choice of where
//! the data goes.
//!
//! [`metrics_reporter`] turns a path, a set of label names and some const labels into a
//! metric handle. Code that records metrics only sees the [`Reporter`], [`Counter`],
//! [`Gauge`] and [`Observer`] traits; the application's startup decides the backend:
//!
//! * [`NoopReporter`] records nothing. Good for tests and for turning metrics off.
//! * [`PrometheusReporter`] registers real [`prometheus`] metrics in a [`SharedRegistry`]
//!   that you own and expose.
//!
//! Reporters vend one handle per path. Asking again for the same path returns the same handle,
//! so it's fine to ask lazily - but cache your handles on hot paths.
//!
//! # Examples
//!
//! ```
//! use metrics_reporter::{
//!     new_reporter, Backend, MetricConfiguration, ReporterConfiguration, SharedRegistry,
//! };
//!
//! let registry = SharedRegistry::new();
//! let mut configuration = ReporterConfiguration::new("shop");
//! configuration.subsystem("checkout");
//! let reporter = new_reporter(Backend::Prometheus(registry.clone()), &configuration);
//!
//! let payments = reporter.counter(&MetricConfiguration::new("payments_total", ["method"]));
//! payments.count(1.0, &[("method", "card")].into());
//!
//! let families = registry.gather();
//! assert_eq!("shop_checkout_payments_total", families[0].get_name());
//! ```

pub mod backend;
pub mod configuration;
pub mod error;
pub mod labels;
pub mod registry;
pub mod reporter;
pub mod types;

pub use backend::{NoopReporter, PrometheusReporter};
pub use configuration::{MetricConfiguration, ReporterConfiguration};
pub use error::ReporterError;
pub use labels::merge_labels;
pub use registry::SharedRegistry;
pub use reporter::{new_reporter, Backend, Counter, Gauge, GaugeFn, Observer, Reporter};
pub use types::{ConstLabels, LabelValues, MetricKind, Name};
