use crate::constraint::ConstraintRegistry;
use crate::types::{ConstraintFailure, HostDecision};
use hostgate_core::{Context, HostStateQuery, ResourceRequest};
use tracing::{debug, info};

/// A stage of the scheduler pipeline narrowing the candidate hosts
pub trait HostFilter: Send + Sync {
    /// Return the hosts that remain candidates, in input order
    fn filter(
        &self,
        resource_requests: &[ResourceRequest],
        context: &Context,
        hosts: &[String],
        state: &dyn HostStateQuery,
    ) -> Vec<String>;

    /// Name of the filter
    fn name(&self) -> &str;
}

/// Configuration for the label filter
#[derive(Debug, Clone)]
pub struct LabelFilterConfig {
    /// Keep evaluating a host's constraints after the first failure, so
    /// every failing constraint shows up in the diagnostics
    pub evaluate_all_constraints: bool,
}

impl Default for LabelFilterConfig {
    fn default() -> Self {
        Self {
            evaluate_all_constraints: true,
        }
    }
}

/// Filter keeping hosts that satisfy every registered label constraint
pub struct LabelFilter {
    config: LabelFilterConfig,
    constraints: ConstraintRegistry,
}

impl LabelFilter {
    /// Create a label filter with the default constraints
    pub fn new(config: LabelFilterConfig) -> Self {
        Self::with_registry(config, ConstraintRegistry::default())
    }

    /// Create a label filter with a custom constraint registry
    pub fn with_registry(config: LabelFilterConfig, constraints: ConstraintRegistry) -> Self {
        Self {
            config,
            constraints,
        }
    }

    /// Run the constraints against every host and report per-host outcomes
    pub fn evaluate(
        &self,
        context: &Context,
        hosts: &[String],
        state: &dyn HostStateQuery,
    ) -> Vec<HostDecision> {
        hosts
            .iter()
            .map(|host| self.evaluate_host(host, context, state))
            .collect()
    }

    fn evaluate_host(
        &self,
        host: &str,
        context: &Context,
        state: &dyn HostStateQuery,
    ) -> HostDecision {
        let mut failures = Vec::new();

        for constraint in self.constraints.iter() {
            let result = constraint.matches(host, state, context);
            if result.passed {
                continue;
            }

            let reason = result.reason.unwrap_or_default();
            info!(
                "Host {} is NOT qualified for context {} ({}: {})",
                result.host_name,
                context,
                constraint.name(),
                reason
            );
            failures.push(ConstraintFailure {
                constraint: constraint.name().to_string(),
                reason,
            });

            if !self.config.evaluate_all_constraints {
                break;
            }
        }

        HostDecision {
            host: host.to_string(),
            qualified: failures.is_empty(),
            failures,
        }
    }
}

impl Default for LabelFilter {
    fn default() -> Self {
        Self::new(LabelFilterConfig::default())
    }
}

impl HostFilter for LabelFilter {
    fn filter(
        &self,
        _resource_requests: &[ResourceRequest],
        context: &Context,
        hosts: &[String],
        state: &dyn HostStateQuery,
    ) -> Vec<String> {
        debug!(
            "Filtering {} hosts with constraints [{}]",
            hosts.len(),
            self.constraints.names().join(",")
        );

        let qualified: Vec<String> = self
            .evaluate(context, hosts, state)
            .into_iter()
            .filter(|d| d.qualified)
            .map(|d| d.host)
            .collect();

        info!(
            "Hosts {} are qualified for context {}",
            qualified.join(","),
            context
        );

        qualified
    }

    fn name(&self) -> &str {
        "LabelFilter"
    }
}
