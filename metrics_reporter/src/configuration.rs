use crate::types::{ConstLabels, Name};

/// Naming shared by every metric a reporter vends.
///
/// ```
/// # use metrics_reporter::ReporterConfiguration;
/// let mut configuration = ReporterConfiguration::new("shop");
/// configuration
///     .subsystem("checkout")
///     .const_label("region", "us-east");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReporterConfiguration {
    pub(crate) system: Name,
    pub(crate) subsystem: Name,
    pub(crate) const_labels: ConstLabels,
}

impl ReporterConfiguration {
    /// Create a configuration for a system. The system is the namespace prefixed to every metric.
    pub fn new(system: impl Into<Name>) -> Self {
        Self {
            system: system.into(),
            ..Default::default()
        }
    }

    /// Set the subsystem (default none). It is prefixed to every metric after the system.
    pub fn subsystem(&mut self, subsystem: impl Into<Name>) -> &mut Self {
        self.subsystem = subsystem.into();
        self
    }

    /// Add a label with a fixed value to every metric of the reporter.
    pub fn const_label(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.const_labels.insert(name.into(), value.into());
        self
    }
}

/// What to create at a path.
///
/// ```
/// # use metrics_reporter::MetricConfiguration;
/// let mut configuration = MetricConfiguration::new("request_seconds", ["method", "status"]);
/// configuration
///     .help("time spent serving requests")
///     .buckets(vec![0.005, 0.05, 0.5, 5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct MetricConfiguration {
    pub(crate) path: Name,
    pub(crate) help: Option<String>,
    pub(crate) labels: Vec<Name>,
    pub(crate) const_labels: ConstLabels,
    pub(crate) buckets: Option<Vec<f64>>,
}

impl MetricConfiguration {
    /// Create a configuration for the metric at `path`, recorded with values for `labels`.
    pub fn new(path: impl Into<Name>, labels: impl IntoIterator<Item = impl Into<Name>>) -> Self {
        Self {
            path: path.into(),
            help: None,
            labels: labels.into_iter().map(Into::into).collect(),
            const_labels: Default::default(),
            buckets: None,
        }
    }

    /// Set the help text (default is the path)
    pub fn help(&mut self, help: impl Into<String>) -> &mut Self {
        self.help = Some(help.into());
        self
    }

    /// Add a label with a fixed value to this metric only.
    pub fn const_label(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.const_labels.insert(name.into(), value.into());
        self
    }

    /// Set histogram bucket upper bounds (default is the client's default buckets).
    /// Only histograms use this.
    pub fn buckets(&mut self, buckets: Vec<f64>) -> &mut Self {
        self.buckets = Some(buckets);
        self
    }

    /// The path this metric is cached under
    pub fn path(&self) -> &Name {
        &self.path
    }

    pub(crate) fn help_text(&self) -> String {
        self.help
            .clone()
            .unwrap_or_else(|| self.path.as_str().to_owned())
    }

    pub(crate) fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(Name::as_str).collect()
    }
}

impl From<&'static str> for MetricConfiguration {
    /// An unlabeled metric at a path
    fn from(path: &'static str) -> Self {
        Self::new(path, std::iter::empty::<Name>())
    }
}

#[cfg(test)]
mod test {
    use super::{MetricConfiguration, ReporterConfiguration};

    #[test_log::test]
    fn help_defaults_to_path() {
        let mut configuration = MetricConfiguration::new("requests", ["method"]);
        assert_eq!("requests", configuration.help_text());

        configuration.help("requests served");
        assert_eq!("requests served", configuration.help_text());
        assert_eq!(vec!["method"], configuration.label_names());
    }

    #[test_log::test]
    fn reporter_setters_chain() {
        let mut configuration = ReporterConfiguration::new("shop");
        configuration
            .subsystem("checkout")
            .const_label("region", "us-east")
            .const_label("zone", "b");

        assert_eq!("shop", configuration.system.as_str());
        assert_eq!("checkout", configuration.subsystem.as_str());
        assert_eq!(2, configuration.const_labels.len());
    }
}
