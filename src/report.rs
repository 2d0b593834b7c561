//! Presentation of evaluation state
//!
//! Nothing here takes part in evaluation. Reports are built from the
//! read-only accessors of the nodes and can be rendered as text (via
//! `Display`) or as JSON. They are an output format only and are never
//! read back.

use crate::condition::{
    Arity, Combinator, Condition, ConditionSet, Node, NodeId, Predicate, Validity,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

// ============================================================================
// Report Tree
// ============================================================================

/// Snapshot of one node's configuration and latest evaluation state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationReport {
    Condition {
        id: NodeId,
        predicate: Option<Predicate>,
        /// Resolved subject if evaluated, else the configured expression
        subject: Option<Value>,
        /// Resolved second operand if evaluated, else the configured one
        #[serde(skip_serializing_if = "Option::is_none")]
        operand: Option<Value>,
        validity: Validity,
    },
    Set {
        id: NodeId,
        combinator: Combinator,
        validity: Validity,
        children: Vec<EvaluationReport>,
    },
}

impl EvaluationReport {
    pub fn of_condition(condition: &Condition) -> Self {
        let evaluated = condition.validity().is_evaluated();
        let (subject, operand) = if evaluated {
            (
                condition.resolved_subject().cloned(),
                condition.resolved_operand().cloned(),
            )
        } else {
            (
                condition.expression().cloned(),
                condition.operand().cloned(),
            )
        };

        // Unary predicates ignore any leftover operand
        let operand = match condition.predicate().map(Predicate::arity) {
            Some(Arity::Unary) => None,
            _ => operand,
        };

        EvaluationReport::Condition {
            id: condition.id(),
            predicate: condition.predicate(),
            subject,
            operand,
            validity: condition.validity(),
        }
    }

    pub fn of_set(set: &ConditionSet) -> Self {
        EvaluationReport::Set {
            id: set.id(),
            combinator: set.combinator(),
            validity: Validity::from(set.is_valid()),
            children: set.children().iter().map(EvaluationReport::of_node).collect(),
        }
    }

    pub fn of_node(node: &Node) -> Self {
        match node {
            Node::Condition(condition) => Self::of_condition(condition),
            Node::Set(set) => Self::of_set(set),
        }
    }

    #[inline]
    pub fn validity(&self) -> Validity {
        match self {
            EvaluationReport::Condition { validity, .. } | EvaluationReport::Set { validity, .. } => {
                *validity
            }
        }
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "   ".repeat(depth);
        match self {
            EvaluationReport::Condition {
                id,
                predicate,
                subject,
                operand,
                validity,
            } => {
                let subject = subject.as_ref().map_or_else(|| "null".to_string(), render);
                let predicate = predicate.map_or("<no predicate>", Predicate::name);
                write!(f, "{}Condition {}: when {} {}", indent, id, subject, predicate)?;
                if let Some(operand) = operand {
                    write!(f, " {}", render(operand))?;
                }
                writeln!(f, " evaluates to {}.", validity)
            }
            EvaluationReport::Set {
                id,
                combinator,
                validity,
                children,
            } => {
                writeln!(
                    f,
                    "{}Condition Set {} evaluates to true when {} conditions pass (currently {}).",
                    indent, id, combinator, validity
                )?;
                for child in children {
                    child.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", EvaluationReport::of_condition(self))
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", EvaluationReport::of_set(self))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Strings render bare, everything else as compact JSON
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
