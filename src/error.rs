//! Error types for the rule-condition engine

use crate::condition::NodeId;
use thiserror::Error;

/// Main error type for building and evaluating condition trees
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// `evaluate` was called on a condition with no predicate selected
    #[error("Misconfigured condition {id}: no predicate selected before evaluate")]
    Unconfigured { id: NodeId },

    #[error("Unknown child: {0}")]
    UnknownChild(NodeId),

    #[error("Invalid target: {0}")]
    Target(String),

    #[error("Unknown combinator: {0}")]
    UnknownCombinator(String),
}

/// Result type alias for the rule-condition engine
pub type Result<T> = std::result::Result<T, ConditionError>;
