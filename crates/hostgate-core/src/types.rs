use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the label pool holding operator-applied host labels
pub const HOST_LABELS_POOL: &str = "hostLabels";

/// Scalar label value as written in a snapshot or context document
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelValue {
    Text(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl LabelValue {
    fn into_string(self) -> String {
        match self {
            LabelValue::Text(s) => s,
            LabelValue::Bool(b) => b.to_string(),
            LabelValue::Int(i) => i.to_string(),
            LabelValue::UInt(u) => u.to_string(),
            LabelValue::Float(f) => f.to_string(),
        }
    }
}

/// Read a label map, keeping unquoted YAML scalars (`gpu: true`, `rack: 3`)
/// as their text and null as the empty string
fn deserialize_labels<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Option<LabelValue>> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, v.map(LabelValue::into_string).unwrap_or_default()))
        .collect())
}

/// A named set of labels attached to a host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPool {
    /// Label key to label value
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: BTreeMap<String, String>,
}

impl LabelPool {
    /// Create an empty label pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, returning the updated pool
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Get a label value by exact key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// A candidate host and its label pools
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// Unique host name
    pub name: String,
    /// Pools keyed by pool name (e.g., "hostLabels")
    #[serde(default)]
    pub pools: BTreeMap<String, LabelPool>,
}

impl Host {
    /// Create a host without any pools
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pools: BTreeMap::new(),
        }
    }

    /// Attach a pool, returning the updated host
    pub fn with_pool(mut self, pool_name: impl Into<String>, pool: LabelPool) -> Self {
        self.pools.insert(pool_name.into(), pool);
        self
    }

    /// Attach the "hostLabels" pool
    pub fn with_host_labels(self, pool: LabelPool) -> Self {
        self.with_pool(HOST_LABELS_POOL, pool)
    }

    /// Get a pool by name
    pub fn pool(&self, pool_name: &str) -> Option<&LabelPool> {
        self.pools.get(pool_name)
    }
}

/// One entry of a placement request, carrying its container labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Container-level labels declared by the workload
    #[serde(default, deserialize_with = "deserialize_labels")]
    pub labels: BTreeMap<String, String>,
}

impl ContextEntry {
    /// Create an entry without labels
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, returning the updated entry
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// Placement request context: an ordered sequence of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    entries: Vec<ContextEntry>,
}

impl Context {
    /// Create a context from its entries
    pub fn new(entries: Vec<ContextEntry>) -> Self {
        Self { entries }
    }

    /// Iterate over entries in request order
    pub fn iter(&self) -> std::slice::Iter<'_, ContextEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ContextEntry>> for Context {
    fn from(entries: Vec<ContextEntry>) -> Self {
        Self::new(entries)
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = &'a ContextEntry;
    type IntoIter = std::slice::Iter<'a, ContextEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let labels: Vec<String> = entry
                .labels
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "{{{}}}", labels.join(","))?;
        }
        write!(f, "]")
    }
}

/// A resource request accompanying a placement request
///
/// Label filtering accepts these but does not look at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// Resource name (e.g., "memory", "cpu")
    pub resource: String,
    /// Requested amount in the resource's base unit
    pub amount: i64,
}

impl ResourceRequest {
    pub fn new(resource: impl Into<String>, amount: i64) -> Self {
        Self {
            resource: resource.into(),
            amount,
        }
    }
}
