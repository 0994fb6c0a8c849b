use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// `i64::MIN` is exactly representable; `i64::MAX` is not, so the upper bound
// is exclusive at 2^63.
const I64_FLOAT_MIN: f64 = i64::MIN as f64;
const I64_FLOAT_END: f64 = 9_223_372_036_854_775_808.0;

/// Opaque identifier carried by list entries. The client app uses either
/// strings or integer timestamps, so both are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Int(i64),
    Text(String),
}

impl EntryId {
    /// Reads an id out of a JSON scalar. Empty strings, floats that are not
    /// whole numbers and every non-scalar yield `None`. Whole numbers outside
    /// the `i64` range keep their decimal text so they stay distinct.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(EntryId::Text(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Some(EntryId::Int(i));
                }
                if let Some(u) = n.as_u64() {
                    return Some(EntryId::Text(u.to_string()));
                }
                let f = n.as_f64().filter(|f| f.is_finite() && f.fract() == 0.0)?;
                if f >= I64_FLOAT_MIN && f < I64_FLOAT_END {
                    Some(EntryId::Int(f as i64))
                } else {
                    Some(EntryId::Text(n.to_string()))
                }
            }
            _ => None,
        }
    }

    /// Id of a list item: present only when the item is an object with an
    /// `id` field holding a usable scalar.
    pub fn of_item(item: &Value) -> Option<Self> {
        item.as_object()
            .and_then(|obj| obj.get("id"))
            .and_then(EntryId::from_value)
    }
}

impl From<EntryId> for Value {
    fn from(id: EntryId) -> Self {
        match id {
            EntryId::Int(i) => Value::from(i),
            EntryId::Text(s) => Value::String(s),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Int(i) => write!(f, "{i}"),
            EntryId::Text(s) => f.write_str(s),
        }
    }
}

/// A list entry whose identity may or may not be known.
///
/// `id: None` means "no identity"; an id that has no counterpart in another
/// record is still `Some` and is treated as a distinct item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Identified<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(flatten)]
    pub value: T,
}

impl<T> Identified<T> {
    pub fn new(id: Option<EntryId>, value: T) -> Self {
        Self { id, value }
    }

    #[cfg(test)]
    pub fn anonymous(value: T) -> Self {
        Self { id: None, value }
    }
}

/// Source of synthetic keys for entries that arrive without one.
///
/// Passed explicitly to whoever needs fresh ids; there is no process-wide
/// counter.
pub trait KeySource {
    fn next_key(&mut self) -> EntryId;
}

/// Random v4 UUIDs. Used by the HTTP layer, where ids must not collide with
/// ids minted by other clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeys;

impl KeySource for UuidKeys {
    fn next_key(&mut self) -> EntryId {
        EntryId::Text(Uuid::new_v4().to_string())
    }
}

/// Deterministic `<prefix>-<n>` keys, for callers that need reproducible ids
/// (fixtures, imports that are re-run).
#[derive(Debug, Clone)]
pub struct SequentialKeys {
    prefix: String,
    next: u64,
}

impl SequentialKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.next = 1;
    }
}

impl KeySource for SequentialKeys {
    fn next_key(&mut self) -> EntryId {
        let key = EntryId::Text(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        key
    }
}
