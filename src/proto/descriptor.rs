use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::kind::{Field, StreamKind};

/// Structured form of one stream endpoint.
///
/// Values are kept trimmed and a blank value is never stored, so an absent
/// field and an empty one compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    pub kind: StreamKind,
    #[serde(default)]
    pub fields: BTreeMap<Field, String>,
}

impl ConnectionDescriptor {
    pub fn new(kind: StreamKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
        }
    }

    /// Builder form of [`set`](Self::set). Fields the kind does not list are dropped.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Store `value` for `field`. Returns false if the kind has no such field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> bool {
        if !self.kind.accepts(field) {
            return false;
        }
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value.to_string());
        }
        true
    }

    /// Value of `field`, or "" when unset.
    pub fn get(&self, field: Field) -> &str {
        self.fields.get(&field).map(|s| s.as_str()).unwrap_or("")
    }

    /// Required fields that are still blank, in form order.
    pub fn missing_required(&self) -> Vec<Field> {
        self.kind
            .fields()
            .iter()
            .filter(|spec| spec.required && self.get(spec.field).trim().is_empty())
            .map(|spec| spec.field)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}
