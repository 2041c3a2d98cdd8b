//! Reporter implementations

mod noop_backend;
mod prometheus_backend;

pub use noop_backend::{NoopCounter, NoopGauge, NoopObserver, NoopReporter};
pub use prometheus_backend::{
    PrometheusCounter, PrometheusGauge, PrometheusObserver, PrometheusReporter,
};
