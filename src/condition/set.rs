//! Composite condition set

use crate::condition::meta::NodeMeta;
use crate::condition::node::{check_attribute, AttributeRejection, ContextBinding, Node};
use crate::condition::NodeId;
use crate::error::{ConditionError, Result};
use crate::target::Target;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::SystemTime;

/// Logical rule a set applies over its children's results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// True when every child is true (vacuously true)
    #[default]
    All,
    /// True when at least one child is true (vacuously false)
    Any,
    /// True when no child is true
    None,
}

impl Combinator {
    /// Aggregate already evaluated child results
    pub fn apply<I: IntoIterator<Item = bool>>(self, results: I) -> bool {
        let mut results = results.into_iter();
        match self {
            Combinator::All => results.all(|r| r),
            Combinator::Any => results.any(|r| r),
            Combinator::None => !results.any(|r| r),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::All => "all",
            Combinator::Any => "any",
            Combinator::None => "none",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Combinator {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Combinator::All),
            "any" => Ok(Combinator::Any),
            "none" => Ok(Combinator::None),
            _ => Err(ConditionError::UnknownCombinator(s.trim().to_string())),
        }
    }
}

/// Ordered collection of child nodes aggregated under a [`Combinator`].
///
/// Binding a target or attribute on a set overwrites the binding on every
/// descendant. Evaluation is deep and eager: every child is re-evaluated
/// on every call.
#[derive(Debug, Clone)]
pub struct ConditionSet {
    meta: NodeMeta,
    target: Option<Arc<Target>>,
    attribute: Option<String>,
    combinator: Combinator,
    children: Vec<Node>,
    index: AHashMap<NodeId, usize>,
    valid: bool,
    diagnostics: Vec<AttributeRejection>,
}

impl Default for ConditionSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionSet {
    pub fn new() -> Self {
        Self {
            meta: NodeMeta::new(),
            target: None,
            attribute: None,
            combinator: Combinator::All,
            children: Vec::new(),
            index: AHashMap::new(),
            valid: true,
            diagnostics: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Composite management
    // ------------------------------------------------------------------

    /// Append a child. A child whose id is already present replaces the
    /// existing one in place.
    pub fn add(&mut self, node: impl Into<Node>) -> &mut Self {
        let node = node.into();
        let id = node.id();
        match self.index.get(&id).copied() {
            Some(pos) => self.children[pos] = node,
            None => {
                self.index.insert(id, self.children.len());
                self.children.push(node);
            }
        }
        self
    }

    pub fn get(&self, id: NodeId) -> Result<&Node> {
        let pos = self.position(id)?;
        Ok(&self.children[pos])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        let pos = self.position(id)?;
        Ok(&mut self.children[pos])
    }

    /// Children in insertion order
    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Detach and return a child
    pub fn remove(&mut self, id: NodeId) -> Result<Node> {
        let pos = self.position(id)?;
        let node = self.children.remove(pos);
        self.index.remove(&id);
        for (offset, child) in self.children[pos..].iter().enumerate() {
            self.index.insert(child.id(), pos + offset);
        }
        Ok(node)
    }

    /// Drop every child
    pub fn clear(&mut self) -> &mut Self {
        self.children.clear();
        self.index.clear();
        self
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn position(&self, id: NodeId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(ConditionError::UnknownChild(id))
    }

    // ------------------------------------------------------------------
    // Combinator selection
    // ------------------------------------------------------------------

    pub fn set_combinator(&mut self, combinator: Combinator) -> &mut Self {
        self.combinator = combinator;
        self
    }

    pub fn when_all(&mut self) -> &mut Self {
        self.set_combinator(Combinator::All)
    }

    pub fn when_any(&mut self) -> &mut Self {
        self.set_combinator(Combinator::Any)
    }

    pub fn when_none(&mut self) -> &mut Self {
        self.set_combinator(Combinator::None)
    }

    // ------------------------------------------------------------------
    // Evaluation context
    // ------------------------------------------------------------------

    /// Bind a plain value as the target of this set and all descendants
    pub fn bind_target(&mut self, value: impl Into<Value>) -> &mut Self {
        self.set_target(Arc::new(Target::new(value)));
        self
    }

    /// Bind a serializable record as the target of this set and all
    /// descendants
    pub fn bind_record<T: Serialize>(&mut self, record: &T) -> Result<&mut Self> {
        self.set_target(Arc::new(Target::from_record(record)?));
        Ok(self)
    }

    pub fn bind_shared_target(&mut self, target: Arc<Target>) -> &mut Self {
        self.set_target(target);
        self
    }

    /// Select an attribute here and on every descendant; each node
    /// validates the name against its own target
    pub fn bind_attribute(&mut self, name: &str) -> &mut Self {
        self.set_attribute(name);
        self
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Re-evaluate every child in order, then aggregate.
    ///
    /// A misconfigured descendant aborts evaluation with its error; the
    /// set's previous validity is left untouched in that case.
    pub fn evaluate(&mut self) -> Result<&mut Self> {
        let mut results: SmallVec<[bool; 8]> = SmallVec::with_capacity(self.children.len());
        for child in self.children.iter_mut() {
            results.push(child.evaluate()?.is_true());
        }

        self.valid = self.combinator.apply(results.iter().copied());

        log::debug!(
            "condition set {}: {} of {} children -> {}",
            self.meta.id,
            self.combinator,
            results.len(),
            self.valid
        );

        Ok(self)
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
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Result of the latest evaluation; `true` before the first one
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn target(&self) -> Option<&Arc<Target>> {
        self.target.as_ref()
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Attribute names this set rejected for itself (children keep their own)
    pub fn diagnostics(&self) -> &[AttributeRejection] {
        &self.diagnostics
    }
}

impl ContextBinding for ConditionSet {
    fn set_target(&mut self, target: Arc<Target>) {
        for child in self.children.iter_mut() {
            child.set_target(Arc::clone(&target));
        }
        self.target = Some(target);
    }

    fn set_attribute(&mut self, name: &str) {
        match check_attribute(self.meta.id, self.target.as_ref(), name) {
            Ok(()) => self.attribute = Some(name.to_string()),
            Err(rejection) => self.diagnostics.push(rejection),
        }
        for child in self.children.iter_mut() {
            child.set_attribute(name);
        }
    }
}
