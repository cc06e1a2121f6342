use crate::labels::{normalize_context, parse_label, REQUIRE_ANY_LABEL};
use crate::types::ConstraintResult;
use hostgate_core::{Context, HostStateQuery, HOST_LABELS_POOL};
use tracing::{debug, warn};

/// Label constraint trait
pub trait Constraint: Send + Sync {
    /// Check whether a host is eligible for the given context
    fn matches(&self, host: &str, state: &dyn HostStateQuery, context: &Context)
        -> ConstraintResult;

    /// Name of the constraint
    fn name(&self) -> &str;
}

/// Host taint satisfied by any one matching container label
///
/// The host's "hostLabels" pool may carry `io.rancher.scheduler.require_any`
/// with a list of `key` or `key=value` tokens. The host qualifies if at least
/// one context entry has one of those keys (with the exact value, when given).
/// Hosts without the pool or the label qualify.
pub struct RequireAnyConstraint;

impl Constraint for RequireAnyConstraint {
    fn matches(
        &self,
        host: &str,
        state: &dyn HostStateQuery,
        context: &Context,
    ) -> ConstraintResult {
        let pool = match state.label_pool(host, HOST_LABELS_POOL) {
            Some(pool) => pool,
            None => {
                debug!("Host {} has no {} pool", host, HOST_LABELS_POOL);
                return ConstraintResult::pass(host);
            }
        };

        let raw = match pool.get(REQUIRE_ANY_LABEL) {
            Some(value) if !value.is_empty() => value,
            _ => {
                debug!("Host {} has no require-any labels", host);
                return ConstraintResult::pass(host);
            }
        };

        let required = parse_label(raw);
        if required.dropped() > 0 {
            warn!(
                "Host {} label {} has {} malformed token(s): {:?}",
                host,
                REQUIRE_ANY_LABEL,
                required.dropped(),
                raw
            );
        }

        let container_labels = normalize_context(context);

        for (key, value) in required.iter() {
            for labels in &container_labels {
                if value.is_empty() {
                    if labels.contains_key(key) {
                        debug!("Host {} is qualified because it has label {}", host, key);
                        return ConstraintResult::pass(host);
                    }
                } else if labels.get(key) == Some(value) {
                    debug!(
                        "Host {} is qualified because it has label {}={}",
                        host, key, value
                    );
                    return ConstraintResult::pass(host);
                }
            }
        }

        ConstraintResult::fail(
            host,
            format!("No toleration for any of the required labels [{}]", required),
        )
    }

    fn name(&self) -> &str {
        "RequireAnyLabel"
    }
}

/// Ordered set of constraints applied by the label filter
pub struct ConstraintRegistry {
    constraints: Vec<Box<dyn Constraint>>,
}

impl ConstraintRegistry {
    /// Registry without any constraints; every host qualifies
    pub fn empty() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    /// Append a constraint after the ones already registered
    pub fn register(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    /// Iterate over constraints in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Constraint> {
        self.constraints.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Names of registered constraints
    pub fn names(&self) -> Vec<&str> {
        self.constraints.iter().map(|c| c.name()).collect()
    }
}

impl Default for ConstraintRegistry {
    fn default() -> Self {
        Self {
            constraints: default_constraints(),
        }
    }
}

/// Get default constraints
pub fn default_constraints() -> Vec<Box<dyn Constraint>> {
    vec![Box::new(RequireAnyConstraint)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostgate_core::{ContextEntry, Host, HostStateSnapshot, LabelPool};

    fn create_test_state(require_any: Option<&str>) -> HostStateSnapshot {
        let host = match require_any {
            Some(value) => Host::new("host1")
                .with_host_labels(LabelPool::new().with_label(REQUIRE_ANY_LABEL, value)),
            None => Host::new("host1"),
        };
        HostStateSnapshot::new(vec![host])
    }

    fn create_test_context(labels: &[(&str, &str)]) -> Context {
        let entry = labels
            .iter()
            .fold(ContextEntry::new(), |entry, (k, v)| entry.with_label(*k, *v));
        Context::new(vec![entry])
    }

    fn matches(require_any: Option<&str>, context: &Context) -> bool {
        let state = create_test_state(require_any);
        RequireAnyConstraint.matches("host1", &state, context).passed
    }

    #[test]
    fn test_no_pool_passes() {
        assert!(matches(None, &create_test_context(&[])));
        assert!(matches(None, &create_test_context(&[("team", "dev")])));
    }

    #[test]
    fn test_missing_or_empty_label_passes() {
        let state = HostStateSnapshot::new(vec![
            Host::new("host1").with_host_labels(LabelPool::new().with_label("zone", "a"))
        ]);
        let context = create_test_context(&[]);
        assert!(RequireAnyConstraint.matches("host1", &state, &context).passed);

        assert!(matches(Some(""), &context));
    }

    #[test]
    fn test_result_names_evaluated_host() {
        let state = create_test_state(Some("team=infra"));

        let fail = RequireAnyConstraint.matches("host1", &state, &create_test_context(&[]));
        assert_eq!(fail.host_name, "host1");

        let pass = RequireAnyConstraint.matches("other", &state, &create_test_context(&[]));
        assert_eq!(pass.host_name, "other");
    }

    #[test]
    fn test_unknown_host_passes() {
        let state = create_test_state(Some("team=infra"));
        let result = RequireAnyConstraint.matches("other", &state, &create_test_context(&[]));
        assert!(result.passed);
    }

    #[test]
    fn test_case_insensitive_match() {
        let context = create_test_context(&[("TEAM", "Backend")]);
        assert!(matches(Some("Team=Backend"), &context));
        assert!(matches(Some("team=backend"), &context));
    }

    #[test]
    fn test_presence_only_match() {
        assert!(matches(Some("gpu"), &create_test_context(&[("gpu", "")])));
        assert!(matches(Some("gpu"), &create_test_context(&[("gpu", "nvidia")])));
        assert!(!matches(Some("gpu"), &create_test_context(&[("cpu", "gpu")])));
    }

    #[test]
    fn test_exact_value_match() {
        assert!(matches(Some("zone=us-east"), &create_test_context(&[("zone", "us-east")])));
        assert!(!matches(Some("zone=us-east"), &create_test_context(&[("zone", "us-west")])));
        assert!(!matches(Some("zone=us-east"), &create_test_context(&[("zone", "")])));
        assert!(!matches(Some("zone=us-east"), &create_test_context(&[])));
    }

    #[test]
    fn test_any_requirement_suffices() {
        let context = create_test_context(&[("gpu", "true")]);
        assert!(matches(Some("zone=us-east,gpu"), &context));
    }

    #[test]
    fn test_any_context_entry_suffices() {
        let context = Context::new(vec![
            ContextEntry::new().with_label("team", "dev"),
            ContextEntry::new().with_label("team", "infra"),
        ]);
        assert!(matches(Some("team=infra"), &context));
    }

    #[test]
    fn test_malformed_token_ignored() {
        assert!(matches(
            Some("a=b=c,zone=us-east"),
            &create_test_context(&[("zone", "us-east")])
        ));
        assert!(!matches(
            Some("a=b=c,zone=us-east"),
            &create_test_context(&[("a", "b=c")])
        ));
    }

    #[test]
    fn test_only_malformed_tokens_fail() {
        assert!(!matches(Some("a=b=c"), &create_test_context(&[("a", "b")])));
    }

    #[test]
    fn test_empty_context_fails() {
        let result = RequireAnyConstraint.matches(
            "host1",
            &create_test_state(Some("team=infra")),
            &Context::default(),
        );

        assert!(!result.passed);
        assert!(result.reason.unwrap().contains("team=infra"));
    }

    #[test]
    fn test_registry() {
        let registry = ConstraintRegistry::default();
        assert_eq!(registry.names(), vec!["RequireAnyLabel"]);

        let registry = ConstraintRegistry::empty();
        assert!(registry.is_empty());

        let registry = registry.register(RequireAnyConstraint).register(RequireAnyConstraint);
        assert_eq!(registry.len(), 2);
    }
}
