//! Target instances inspected by condition trees
//!
//! A target wraps a JSON value. Its attributes are the keys of a JSON
//! object; every other kind of value exposes no attributes.

use crate::error::{ConditionError, Result};
use serde::Serialize;
use serde_json::Value;

/// The object whose attributes a condition tree inspects
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    type_name: String,
    value: Value,
}

impl Target {
    /// Wrap a plain value, naming it after its JSON kind
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            type_name: kind_name(&value).to_string(),
            value,
        }
    }

    /// Wrap a value under an explicit type name
    pub fn named(type_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// Serialize a record into a target named after its Rust type
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self> {
        let value =
            serde_json::to_value(record).map_err(|e| ConditionError::Target(e.to_string()))?;
        Ok(Self {
            type_name: short_type_name::<T>().to_string(),
            value,
        })
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Look up an attribute by name
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        match &self.value {
            Value::Object(map) => map.get(name),
            _ => None,
        }
    }
}

/// Type name used in diagnostics when no target is bound
pub(crate) const UNBOUND_TYPE_NAME: &str = "NoneType";

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => UNBOUND_TYPE_NAME,
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Keep generic arguments intact, strip only the leading module path
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Customer {
        name: String,
        age: i32,
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Target::new(5).type_name(), "int");
        assert_eq!(Target::new(2.5).type_name(), "float");
        assert_eq!(Target::new("").type_name(), "str");
        assert_eq!(Target::new(true).type_name(), "bool");
        assert_eq!(Target::new(json!([1, 2])).type_name(), "list");
        assert_eq!(Target::new(json!({"a": 1})).type_name(), "dict");
        assert_eq!(Target::new(Value::Null).type_name(), "NoneType");
    }

    #[test]
    fn test_record_attributes() {
        let target = Target::from_record(&Customer {
            name: "Ada".to_string(),
            age: 36,
        })
        .unwrap();

        assert_eq!(target.type_name(), "Customer");
        assert!(target.has_attribute("name"));
        assert_eq!(target.attribute("age"), Some(&json!(36)));
        assert!(!target.has_attribute("email"));
    }

    #[derive(Serialize)]
    struct Grid {
        cells: HashMap<(i32, i32), i32>,
    }

    #[test]
    fn test_unserializable_record() {
        let mut cells = HashMap::new();
        cells.insert((0, 0), 1);

        let err = Target::from_record(&Grid { cells }).unwrap_err();
        assert!(matches!(err, ConditionError::Target(_)));
        assert!(err.to_string().starts_with("Invalid target: "));
    }

    #[test]
    fn test_scalar_has_no_attributes() {
        let target = Target::new(5);
        assert!(!target.has_attribute("real"));
        assert_eq!(target.attribute("real"), None);
    }

    #[test]
    fn test_named_target() {
        let target = Target::named("Order", json!({"total": 10}));
        assert_eq!(target.type_name(), "Order");
        assert!(target.has_attribute("total"));
    }
}
