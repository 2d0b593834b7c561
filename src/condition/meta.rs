//! Node identity and creation metadata

use serde::Serialize;
use std::fmt;
use std::time::SystemTime;

/// Opaque unique identifier of a condition node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct NodeId(u128);

impl NodeId {
    /// Draw a fresh random identifier
    #[inline]
    pub fn generate() -> Self {
        Self(rand::random())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

/// Identity plus peripheral metadata shared by both node kinds
#[derive(Debug, Clone)]
pub(crate) struct NodeMeta {
    pub(crate) id: NodeId,
    pub(crate) created: SystemTime,
    pub(crate) creator: String,
}

impl NodeMeta {
    pub(crate) fn new() -> Self {
        Self {
            id: NodeId::generate(),
            created: SystemTime::now(),
            creator: current_user(),
        }
    }
}

fn current_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|name| !name.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}
