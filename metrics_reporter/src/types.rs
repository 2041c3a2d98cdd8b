use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::Display,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Constant labels: attached with a fixed value to every series a metric emits.
pub type ConstLabels = HashMap<String, String>;

/// The concrete label values for one recording, keyed by label name.
pub type LabelValues<'a> = HashMap<&'a str, &'a str>;

/// An identifier for metric paths and label names.
///
/// Names compare and hash by their string content, so `Name::from("requests")`
/// and `Name::from(String::from("requests"))` are the same key.
#[derive(Debug, Clone)]
pub enum Name {
    /// A static string Name.
    Str(&'static str),
    /// A String name. Avoid these when you can, because clones can add up.
    String(String),
    /// If you have a rarely-changing identifier you could consider using shared memory
    /// instead of cloning repeatedly.
    Shared(Arc<String>),
}

impl Name {
    /// an &str view of the name
    pub fn as_str(&self) -> &str {
        match self {
            Name::Str(s) => s,
            Name::String(s) => s,
            Name::Shared(s) => s,
        }
    }

    /// True when the name is the empty string
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must match str's Hash so Borrow<str> lookups work.
        self.as_str().hash(state)
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl Default for Name {
    fn default() -> Self {
        Name::Str("")
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for Name {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Str(s)
    }
}

impl From<String> for Name {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Arc<String>> for Name {
    #[inline]
    fn from(s: Arc<String>) -> Self {
        Self::Shared(s)
    }
}

/// The kinds of metric a reporter vends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonically increasing
    Counter,
    /// Settable to any value
    Gauge,
    /// A gauge sampled from a function at collection time
    GaugeFn,
    /// Individual observations with default buckets
    Observer,
    /// Individual observations with configured buckets
    Histogram,
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::GaugeFn => "gauge function",
            MetricKind::Observer => "observer",
            MetricKind::Histogram => "histogram",
        })
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, sync::Arc};

    use super::Name;

    #[test_log::test]
    fn names_compare_by_content() {
        assert_eq!(Name::from("path"), Name::from(String::from("path")));
        assert_eq!(
            Name::from("path"),
            Name::from(Arc::new(String::from("path")))
        );
        assert_ne!(Name::from("path"), Name::from("other_path"));
    }

    #[test_log::test]
    fn names_look_up_by_str() {
        let mut map = HashMap::new();
        map.insert(Name::from(String::from("requests")), 1);

        assert_eq!(Some(&1), map.get("requests"));
        assert_eq!(Some(1), map.remove("requests"));
        assert!(map.is_empty());
    }
}
