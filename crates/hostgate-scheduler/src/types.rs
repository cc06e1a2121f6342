use serde::Serialize;

/// Result of evaluating one constraint against a host
#[derive(Debug, Clone)]
pub struct ConstraintResult {
    /// Host name
    pub host_name: String,
    /// Whether the host satisfied the constraint
    pub passed: bool,
    /// Reason for failure (if any)
    pub reason: Option<String>,
}

impl ConstraintResult {
    /// Create a passing constraint result
    pub fn pass(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            passed: true,
            reason: None,
        }
    }

    /// Create a failing constraint result
    pub fn fail(host_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            passed: false,
            reason: Some(reason.into()),
        }
    }
}

/// A constraint a host did not satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintFailure {
    /// Name of the failing constraint
    pub constraint: String,
    /// Why it failed
    pub reason: String,
}

/// Outcome of running all constraints against a single host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostDecision {
    /// Host name
    pub host: String,
    /// True if every constraint passed
    pub qualified: bool,
    /// Failing constraints, in registry order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ConstraintFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_result() {
        let pass = ConstraintResult::pass("h1");
        assert!(pass.passed);
        assert!(pass.reason.is_none());

        let fail = ConstraintResult::fail("h2", "no matching label");
        assert!(!fail.passed);
        assert_eq!(fail.reason, Some("no matching label".to_string()));
    }

    #[test]
    fn test_host_decision_json_omits_empty_failures() {
        let decision = HostDecision {
            host: "h1".to_string(),
            qualified: true,
            failures: Vec::new(),
        };

        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(json, r#"{"host":"h1","qualified":true}"#);
    }
}
