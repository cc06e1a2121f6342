//! Hostgate Scheduler - Label constraint filtering of candidate hosts
//!
//! This crate provides:
//! - Host filter stage trait
//! - Label filter running every registered constraint per host
//! - Require-any label constraint
//! - Label parsing and context normalization helpers

pub mod constraint;
pub mod filter;
pub mod labels;
pub mod types;

// Re-export commonly used types
pub use constraint::{Constraint, ConstraintRegistry, RequireAnyConstraint};
pub use filter::{HostFilter, LabelFilter, LabelFilterConfig};
pub use labels::{normalize_context, parse_label, ParsedLabelSet, REQUIRE_ANY_LABEL};
pub use types::{ConstraintFailure, ConstraintResult, HostDecision};
