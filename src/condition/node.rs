//! Node contract shared by atomic conditions and condition sets

use crate::condition::{Condition, ConditionSet, NodeId};
use crate::error::Result;
use crate::target::{Target, UNBOUND_TYPE_NAME};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Outcome of the most recent evaluation of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validity {
    #[default]
    NotEvaluated,
    True,
    False,
}

impl Validity {
    /// `NotEvaluated` counts as not true
    #[inline]
    pub fn is_true(self) -> bool {
        self == Validity::True
    }

    #[inline]
    pub fn is_evaluated(self) -> bool {
        self != Validity::NotEvaluated
    }
}

impl From<bool> for Validity {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Validity::True
        } else {
            Validity::False
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validity::NotEvaluated => f.write_str("not evaluated"),
            Validity::True => f.write_str("true"),
            Validity::False => f.write_str("false"),
        }
    }
}

/// Evaluation context binding, implemented by both node kinds.
///
/// A composite assigns the binding locally and then overwrites it on
/// every descendant.
pub trait ContextBinding {
    fn set_target(&mut self, target: Arc<Target>);
    fn set_attribute(&mut self, name: &str);
}

/// An attribute name that was rejected because the bound target lacks it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRejection {
    pub attribute: String,
    pub type_name: String,
}

impl fmt::Display for AttributeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is not a valid attribute for the {} class.",
            self.attribute, self.type_name
        )
    }
}

/// Validate an attribute name against the bound target, emitting a
/// warning when it is rejected
pub(crate) fn check_attribute(
    id: NodeId,
    target: Option<&Arc<Target>>,
    name: &str,
) -> std::result::Result<(), AttributeRejection> {
    match target {
        Some(target) if target.has_attribute(name) => Ok(()),
        _ => {
            let rejection = AttributeRejection {
                attribute: name.to_string(),
                type_name: target
                    .map_or(UNBOUND_TYPE_NAME, |t| t.type_name())
                    .to_string(),
            };
            log::warn!("node {}: {}", id, rejection);
            Err(rejection)
        }
    }
}

/// A child of a condition set: atomic or composite
#[derive(Debug, Clone)]
pub enum Node {
    Condition(Condition),
    Set(Box<ConditionSet>),
}

impl Node {
    #[inline]
    pub fn id(&self) -> NodeId {
        match self {
            Node::Condition(c) => c.id(),
            Node::Set(s) => s.id(),
        }
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(self, Node::Set(_))
    }

    pub fn validity(&self) -> Validity {
        match self {
            Node::Condition(c) => c.validity(),
            Node::Set(s) => Validity::from(s.is_valid()),
        }
    }

    pub fn target(&self) -> Option<&Arc<Target>> {
        match self {
            Node::Condition(c) => c.target(),
            Node::Set(s) => s.target(),
        }
    }

    pub fn attribute(&self) -> Option<&str> {
        match self {
            Node::Condition(c) => c.attribute(),
            Node::Set(s) => s.attribute(),
        }
    }

    /// Re-evaluate this node (and its subtree) and return the fresh state
    pub fn evaluate(&mut self) -> Result<Validity> {
        match self {
            Node::Condition(c) => Ok(c.evaluate()?.validity()),
            Node::Set(s) => Ok(Validity::from(s.evaluate()?.is_valid())),
        }
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            Node::Condition(c) => Some(c),
            Node::Set(_) => None,
        }
    }

    pub fn as_condition_mut(&mut self) -> Option<&mut Condition> {
        match self {
            Node::Condition(c) => Some(c),
            Node::Set(_) => None,
        }
    }

    pub fn as_set(&self) -> Option<&ConditionSet> {
        match self {
            Node::Set(s) => Some(s.as_ref()),
            Node::Condition(_) => None,
        }
    }

    pub fn as_set_mut(&mut self) -> Option<&mut ConditionSet> {
        match self {
            Node::Set(s) => Some(s.as_mut()),
            Node::Condition(_) => None,
        }
    }
}

impl ContextBinding for Node {
    fn set_target(&mut self, target: Arc<Target>) {
        match self {
            Node::Condition(c) => c.set_target(target),
            Node::Set(s) => s.set_target(target),
        }
    }

    fn set_attribute(&mut self, name: &str) {
        match self {
            Node::Condition(c) => c.set_attribute(name),
            Node::Set(s) => s.set_attribute(name),
        }
    }
}

impl From<Condition> for Node {
    fn from(condition: Condition) -> Self {
        Node::Condition(condition)
    }
}

impl From<ConditionSet> for Node {
    fn from(set: ConditionSet) -> Self {
        Node::Set(Box::new(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validity_from_bool() {
        assert_eq!(Validity::from(true), Validity::True);
        assert_eq!(Validity::from(false), Validity::False);
        assert!(!Validity::NotEvaluated.is_true());
        assert!(!Validity::NotEvaluated.is_evaluated());
        assert_eq!(Validity::default(), Validity::NotEvaluated);
    }

    #[test]
    fn test_rejection_message() {
        let target = Arc::new(Target::named("Customer", json!({"age": 3})));
        let id = NodeId::generate();

        assert!(check_attribute(id, Some(&target), "age").is_ok());

        let rejection = check_attribute(id, Some(&target), "email").unwrap_err();
        assert_eq!(
            rejection.to_string(),
            "email is not a valid attribute for the Customer class."
        );

        let unbound = check_attribute(id, None, "age").unwrap_err();
        assert_eq!(unbound.type_name, "NoneType");
    }

    #[test]
    fn test_node_dispatch() {
        let mut node = Node::from(Condition::new());
        assert!(!node.is_composite());
        assert!(node.as_condition().is_some());
        assert!(node.as_set().is_none());

        node.set_target(Arc::new(Target::new(7)));
        assert_eq!(node.target().map(|t| t.value()), Some(&json!(7)));

        let set_node = Node::from(ConditionSet::new());
        assert!(set_node.is_composite());
        assert_eq!(set_node.validity(), Validity::True);
    }
}
