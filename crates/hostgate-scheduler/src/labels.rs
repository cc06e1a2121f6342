use hostgate_core::Context;
use std::collections::BTreeMap;
use std::fmt;

/// Host label holding the require-any toleration list
pub const REQUIRE_ANY_LABEL: &str = "io.rancher.scheduler.require_any";

/// Lowercased requirements parsed from a `key[=value],...` string
///
/// An empty value means the key only has to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLabelSet {
    labels: BTreeMap<String, String>,
    dropped: usize,
}

impl ParsedLabelSet {
    /// Iterate over `(key, value)` requirements in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.labels.iter()
    }

    /// Required value for a key; `Some("")` for presence-only keys
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of malformed tokens skipped while parsing
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl fmt::Display for ParsedLabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .labels
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k.clone()
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Parse a comma-separated list of `key` or `key=value` tokens
///
/// Tokens are trimmed but keys and values are not. Empty tokens and tokens
/// with more than one `=` are skipped and counted in `dropped`. A repeated
/// key keeps its last value.
pub fn parse_label(value: &str) -> ParsedLabelSet {
    let value = value.to_lowercase();
    let mut result = ParsedLabelSet::default();

    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            result.dropped += 1;
            continue;
        }

        let mut pieces = part.split('=');
        match (pieces.next(), pieces.next(), pieces.next()) {
            (Some(key), None, _) => {
                result.labels.insert(key.to_string(), String::new());
            }
            (Some(key), Some(val), None) => {
                result.labels.insert(key.to_string(), val.to_string());
            }
            _ => result.dropped += 1,
        }
    }

    result
}

/// Lowercase the container labels of every context entry, keeping entry order
pub fn normalize_context(context: &Context) -> Vec<BTreeMap<String, String>> {
    context
        .iter()
        .map(|entry| {
            entry
                .labels
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
                .collect()
        })
        .collect()
}
