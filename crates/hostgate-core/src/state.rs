use crate::types::{Host, LabelPool};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only view of scheduler-owned host state
///
/// Callers must keep the underlying data stable for the duration of a
/// filter call, e.g. by handing out a snapshot or holding a read lock.
pub trait HostStateQuery: Send + Sync {
    /// Look up a named label pool of a host
    fn label_pool(&self, host: &str, pool: &str) -> Option<&LabelPool>;
}

/// In-memory host state, usually loaded from a JSON or YAML document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SnapshotDocument", into = "SnapshotDocument")]
pub struct HostStateSnapshot {
    hosts: Vec<Host>,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    hosts: Vec<Host>,
}

impl From<SnapshotDocument> for HostStateSnapshot {
    fn from(doc: SnapshotDocument) -> Self {
        Self::new(doc.hosts)
    }
}

impl From<HostStateSnapshot> for SnapshotDocument {
    fn from(snapshot: HostStateSnapshot) -> Self {
        Self {
            hosts: snapshot.hosts,
        }
    }
}

impl HostStateSnapshot {
    /// Build a snapshot; a repeated host name shadows earlier entries
    pub fn new(hosts: Vec<Host>) -> Self {
        let index = hosts
            .iter()
            .enumerate()
            .map(|(i, host)| (host.name.clone(), i))
            .collect();
        Self { hosts, index }
    }

    /// Get a host by name
    pub fn host(&self, name: &str) -> Option<&Host> {
        self.index.get(name).map(|&i| &self.hosts[i])
    }

    /// Host names in document order
    pub fn host_names(&self) -> Vec<String> {
        self.hosts.iter().map(|h| h.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl HostStateQuery for HostStateSnapshot {
    fn label_pool(&self, host: &str, pool: &str) -> Option<&LabelPool> {
        self.host(host).and_then(|h| h.pool(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HOST_LABELS_POOL;

    fn create_test_snapshot() -> HostStateSnapshot {
        HostStateSnapshot::new(vec![
            Host::new("h2").with_host_labels(LabelPool::new().with_label("zone", "a")),
            Host::new("h1"),
        ])
    }

    #[test]
    fn test_label_pool_lookup() {
        let snapshot = create_test_snapshot();

        assert_eq!(
            snapshot
                .label_pool("h2", HOST_LABELS_POOL)
                .and_then(|p| p.get("zone")),
            Some("a")
        );
        assert!(snapshot.label_pool("h1", HOST_LABELS_POOL).is_none());
        assert!(snapshot.label_pool("missing", HOST_LABELS_POOL).is_none());
    }

    #[test]
    fn test_host_names_keep_document_order() {
        let snapshot = create_test_snapshot();
        assert_eq!(snapshot.host_names(), vec!["h2", "h1"]);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_duplicate_host_shadows_earlier() {
        let snapshot = HostStateSnapshot::new(vec![
            Host::new("h1").with_host_labels(LabelPool::new().with_label("zone", "a")),
            Host::new("h1").with_host_labels(LabelPool::new().with_label("zone", "b")),
        ]);

        assert_eq!(
            snapshot
                .label_pool("h1", HOST_LABELS_POOL)
                .and_then(|p| p.get("zone")),
            Some("b")
        );
    }

    #[test]
    fn test_snapshot_serde() {
        let yaml = r#"
hosts:
  - name: h1
    pools:
      hostLabels:
        labels:
          io.rancher.scheduler.require_any: team=infra
  - name: h2
"#;
        let snapshot: HostStateSnapshot = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(snapshot.host_names(), vec!["h1", "h2"]);
        assert!(snapshot.host("h2").unwrap().pools.is_empty());

        let json = serde_json::to_string(&snapshot).unwrap();
        let reloaded: HostStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.host("h1"), snapshot.host("h1"));
    }
}
