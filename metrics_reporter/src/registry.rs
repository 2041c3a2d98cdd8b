use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use prometheus::{core::Collector, proto::MetricFamily, Registry};

/// A prometheus [`Registry`] plus a record of the label dimensions registered under each
/// metric name.
///
/// The prometheus registry reports a metric whose name and const label values are taken
/// as "already registered", even when its label names or help differ. The record catches
/// that case so it fails like any other conflicting registration.
///
/// Like the prometheus registry, it keeps a name's dimensions for as long as it lives, even
/// after the metric is unregistered.
///
/// Share one `SharedRegistry` (it is cheap to clone) between every reporter that
/// registers into the same prometheus registry.
#[derive(Clone)]
pub struct SharedRegistry {
    registry: Registry,
    /// fully-qualified name -> hash of its help and label names
    dimensions: Arc<Mutex<HashMap<String, u64>>>,
}

/// How a registration went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Registration {
    Registered,
    AlreadyRegistered,
}

impl SharedRegistry {
    /// Wrap a fresh prometheus registry
    pub fn new() -> Self {
        Registry::new().into()
    }

    /// The wrapped prometheus registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Gather every registered metric family, for encoding
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub(crate) fn register(
        &self,
        collector: Box<dyn Collector>,
    ) -> prometheus::Result<Registration> {
        let mut dimensions = self.lock_dimensions();
        let descs: Vec<(String, u64)> = collector
            .desc()
            .into_iter()
            .map(|desc| (desc.fq_name.clone(), desc.dim_hash))
            .collect();
        for (fq_name, dim_hash) in &descs {
            if let Some(known) = dimensions.get(fq_name) {
                if known != dim_hash {
                    return Err(prometheus::Error::Msg(format!(
                        "a previously registered descriptor with the same fully-qualified name as {fq_name} has different label names or a different help string"
                    )));
                }
            }
        }

        let registration = match self.registry.register(collector) {
            Ok(()) => Registration::Registered,
            Err(prometheus::Error::AlreadyReg) => Registration::AlreadyRegistered,
            Err(e) => return Err(e),
        };
        dimensions.extend(descs);
        Ok(registration)
    }

    pub(crate) fn unregister(&self, collector: Box<dyn Collector>) -> prometheus::Result<()> {
        self.registry.unregister(collector)
    }

    fn lock_dimensions(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.dimensions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Registry> for SharedRegistry {
    fn from(registry: Registry) -> Self {
        Self {
            registry,
            dimensions: Default::default(),
        }
    }
}

impl std::fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("names", &self.lock_dimensions().len())
            .finish()
    }
}
