//! Rule Conditions - composite rule-condition engine
//!
//! Build declarative validation rules fluently and evaluate them against
//! arbitrary targets:
//!
//! ```
//! use rule_conditions::{Condition, ConditionSet};
//! use serde_json::json;
//!
//! let mut adult = Condition::new();
//! adult.is_greater_equal(18);
//!
//! // An explicit subject expression takes precedence over the bound attribute
//! let mut named = Condition::new();
//! named.when("name").is_not_empty();
//!
//! let mut rule = ConditionSet::new();
//! rule.add(adult)
//!     .add(named)
//!     .bind_target(json!({"name": "Ada", "age": 36}))
//!     .bind_attribute("age");
//!
//! assert!(rule.evaluate().unwrap().is_valid());
//! ```

pub mod condition;
pub mod error;
pub mod report;
pub mod target;

pub use crate::condition::{
    Arity, AttributeRejection, Combinator, Condition, ConditionSet, ContextBinding, Node, NodeId,
    Predicate, Validity,
};
pub use crate::error::{ConditionError, Result};
pub use crate::report::EvaluationReport;
pub use crate::target::Target;
