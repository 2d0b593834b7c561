//! Atomic condition: one predicate over a resolved subject

use crate::condition::meta::NodeMeta;
use crate::condition::node::{check_attribute, AttributeRejection, ContextBinding, Validity};
use crate::condition::predicate::Predicate;
use crate::condition::NodeId;
use crate::error::{ConditionError, Result};
use crate::target::Target;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::SystemTime;

/// A single condition binding a subject, a predicate and, for binary
/// predicates, a second operand.
///
/// Configuration is fluent; every selector returns `&mut Self`:
///
/// ```
/// use rule_conditions::{Condition, Validity};
///
/// let mut condition = Condition::new();
/// condition.bind_target(5).is_greater(3).evaluate().unwrap();
/// assert_eq!(condition.validity(), Validity::True);
/// ```
#[derive(Debug, Clone)]
pub struct Condition {
    meta: NodeMeta,
    target: Option<Arc<Target>>,
    attribute: Option<String>,
    expression: Option<Value>,
    operand: Option<Value>,
    predicate: Option<Predicate>,
    validity: Validity,
    resolved_subject: Option<Value>,
    resolved_operand: Option<Value>,
    diagnostics: Vec<AttributeRejection>,
}

impl Default for Condition {
    fn default() -> Self {
        Self::new()
    }
}

impl Condition {
    pub fn new() -> Self {
        Self {
            meta: NodeMeta::new(),
            target: None,
            attribute: None,
            expression: None,
            operand: None,
            predicate: None,
            validity: Validity::NotEvaluated,
            resolved_subject: None,
            resolved_operand: None,
            diagnostics: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Evaluation context
    // ------------------------------------------------------------------

    /// Bind a plain value as the target instance
    pub fn bind_target(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set_target(Arc::new(Target::new(value)));
        self
    }

    /// Bind a serializable record as the target instance
    pub fn bind_record<T: Serialize>(&mut self, record: &T) -> Result<&mut Self> {
        self.set_target(Arc::new(Target::from_record(record)?));
        Ok(self)
    }

    /// Bind an already shared target instance
    pub fn bind_shared_target(&mut self, target: Arc<Target>) -> &mut Self {
        self.set_target(target);
        self
    }

    /// Select an attribute of the target. Names the target does not expose
    /// are rejected with a diagnostic; the previous selection is kept.
    pub fn bind_attribute(&mut self, name: &str) -> &mut Self {
        self.set_attribute(name);
        self
    }

    /// Set the subject expression: a literal, or a string naming an
    /// attribute of the target
    pub fn when(&mut self, expression: impl Into<Value>) -> &mut Self {
        self.expression = Some(expression.into());
        self
    }

    // ------------------------------------------------------------------
    // Predicate selection (last selection wins)
    // ------------------------------------------------------------------

    /// Select a predicate without touching the stored second operand
    pub fn select(&mut self, predicate: Predicate) -> &mut Self {
        self.predicate = Some(predicate);
        self
    }

    /// Select a predicate together with its second operand
    pub fn select_with(&mut self, predicate: Predicate, operand: impl Into<Value>) -> &mut Self {
        self.operand = Some(operand.into());
        self.predicate = Some(predicate);
        self
    }

    /// Replace the second operand, keeping the selected predicate
    pub fn with_operand(&mut self, operand: impl Into<Value>) -> &mut Self {
        self.operand = Some(operand.into());
        self
    }

    pub fn is_none(&mut self) -> &mut Self {
        self.select(Predicate::IsNone)
    }

    pub fn is_not_none(&mut self) -> &mut Self {
        self.select(Predicate::IsNotNone)
    }

    pub fn is_empty(&mut self) -> &mut Self {
        self.select(Predicate::IsEmpty)
    }

    pub fn is_not_empty(&mut self) -> &mut Self {
        self.select(Predicate::IsNotEmpty)
    }

    pub fn is_bool(&mut self) -> &mut Self {
        self.select(Predicate::IsBool)
    }

    pub fn is_integer(&mut self) -> &mut Self {
        self.select(Predicate::IsInteger)
    }

    pub fn is_number(&mut self) -> &mut Self {
        self.select(Predicate::IsNumber)
    }

    pub fn is_string(&mut self) -> &mut Self {
        self.select(Predicate::IsString)
    }

    pub fn is_equal(&mut self, b: impl Into<Value>) -> &mut Self {
        self.select_with(Predicate::IsEqual, b)
    }

    pub fn is_not_equal(&mut self, b: impl Into<Value>) -> &mut Self {
        self.select_with(Predicate::IsNotEqual, b)
    }

    pub fn is_less(&mut self, b: impl Into<Value>) -> &mut Self {
        self.select_with(Predicate::IsLess, b)
    }

    pub fn is_less_equal(&mut self, b: impl Into<Value>) -> &mut Self {
        self.select_with(Predicate::IsLessEqual, b)
    }

    pub fn is_greater(&mut self, b: impl Into<Value>) -> &mut Self {
        self.select_with(Predicate::IsGreater, b)
    }

    pub fn is_greater_equal(&mut self, b: impl Into<Value>) -> &mut Self {
        self.select_with(Predicate::IsGreaterEqual, b)
    }

    /// Regular-expression search of the subject
    pub fn is_match(&mut self, pattern: impl Into<Value>) -> &mut Self {
        self.select_with(Predicate::IsMatch, pattern)
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Resolve both operands and apply the selected predicate.
    ///
    /// Fails with [`ConditionError::Unconfigured`] if no predicate has been
    /// selected; the validity is left as `NotEvaluated` in that case.
    pub fn evaluate(&mut self) -> Result<&mut Self> {
        self.validity = Validity::NotEvaluated;

        let predicate = self
            .predicate
            .ok_or(ConditionError::Unconfigured { id: self.meta.id })?;

        let subject = self.resolve_subject();
        let operand = self.operand.as_ref().map(|b| self.resolve(b));
        let result = predicate.apply(&subject, operand.as_ref());

        log::debug!(
            "condition {}: {} {} {:?} -> {}",
            self.meta.id,
            subject,
            predicate,
            operand,
            result
        );

        self.resolved_subject = Some(subject);
        self.resolved_operand = operand;
        self.validity = Validity::from(result);
        Ok(self)
    }

    /// Substitute the target's attribute value when `stored` is a string
    /// naming one; otherwise the literal is used as-is
    fn resolve(&self, stored: &Value) -> Value {
        if let (Value::String(name), Some(target)) = (stored, &self.target) {
            if let Some(value) = target.attribute(name) {
                log::trace!("condition {}: resolved attribute {}", self.meta.id, name);
                return value.clone();
            }
        }
        stored.clone()
    }

    /// Subject precedence: explicit expression, bound attribute, whole
    /// target, null
    fn resolve_subject(&self) -> Value {
        match (&self.expression, &self.attribute, &self.target) {
            (Some(expression), _, _) => self.resolve(expression),
            (None, Some(attribute), _) => self.resolve(&Value::String(attribute.clone())),
            (None, None, Some(target)) => target.value().clone(),
            (None, None, None) => Value::Null,
        }
    }

    // ------------------------------------------------------------------
    // Read-only accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> NodeId {
        self.meta.id
    }

    pub fn created(&self) -> SystemTime {
        self.meta.created
    }

    pub fn creator(&self) -> &str {
        &self.meta.creator
    }

    #[inline]
    pub fn validity(&self) -> Validity {
        self.validity
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validity.is_true()
    }

    pub fn target(&self) -> Option<&Arc<Target>> {
        self.target.as_ref()
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn expression(&self) -> Option<&Value> {
        self.expression.as_ref()
    }

    pub fn operand(&self) -> Option<&Value> {
        self.operand.as_ref()
    }

    pub fn predicate(&self) -> Option<Predicate> {
        self.predicate
    }

    /// Subject as resolved by the most recent evaluation
    pub fn resolved_subject(&self) -> Option<&Value> {
        self.resolved_subject.as_ref()
    }

    /// Second operand as resolved by the most recent evaluation
    pub fn resolved_operand(&self) -> Option<&Value> {
        self.resolved_operand.as_ref()
    }

    /// Attribute names rejected so far, oldest first
    pub fn diagnostics(&self) -> &[AttributeRejection] {
        &self.diagnostics
    }
}

impl ContextBinding for Condition {
    fn set_target(&mut self, target: Arc<Target>) {
        self.target = Some(target);
    }

    fn set_attribute(&mut self, name: &str) {
        match check_attribute(self.meta.id, self.target.as_ref(), name) {
            Ok(()) => self.attribute = Some(name.to_string()),
            Err(rejection) => self.diagnostics.push(rejection),
        }
    }
}
