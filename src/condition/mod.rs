//! Condition tree construction and evaluation module
//!
//! Atomic [`Condition`]s apply one predicate to a subject resolved against
//! a bound target; [`ConditionSet`]s aggregate children under a
//! [`Combinator`].

mod atomic;
pub mod cache;
mod meta;
mod node;
pub mod predicate;
mod set;


pub use atomic::Condition;
pub use cache::{clear_pattern_cache, pattern_cache_size};
pub use meta::NodeId;
pub use node::{AttributeRejection, ContextBinding, Node, Validity};
pub use predicate::{Arity, Predicate};
pub use set::{Combinator, ConditionSet};
