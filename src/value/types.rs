use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap, VecDeque},
};

use chrono::{DateTime, NaiveDate, Utc};
use ordered_float::OrderedFloat;

use super::{CustomValue, NumArray, OrderedMap};

/// Represents a value the codec can convert to and from JSON text.
///
/// This is the full object graph the engine understands: JSON-safe
/// primitives, generic containers, and the typed values (byte buffers,
/// timestamps, sets, ordered maps, numeric arrays) that travel through
/// the wire format as marker objects. Caller-defined types plug in via
/// [`Custom`](Value::Custom).
#[derive(Debug, Clone)]
pub enum Value {
    /// A `null` value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    Str(String),
    /// A binary buffer, encoded as base64 text on the wire.
    Bytes(Vec<u8>),
    /// A UTC timestamp, encoded as RFC 3339 text.
    DateTime(DateTime<Utc>),
    /// A calendar date, encoded as `YYYY-MM-DD` text.
    Date(NaiveDate),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A generic mapping. Key order is not preserved.
    Map(HashMap<String, Value>),
    /// An insertion-ordered mapping. Key order survives the round-trip.
    OrderedMap(OrderedMap),
    /// A set of unique values.
    Set(BTreeSet<Value>),
    /// A double-ended queue, encoded front to back.
    Deque(VecDeque<Value>),
    /// A numeric n-dimensional array, encoded as nested lists.
    Array(NumArray),
    /// A caller-defined value; serializable only when a converter for its
    /// type identifier is registered.
    Custom(CustomValue),
}

impl Value {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".into(),
            Value::Bool(_) => "bool".into(),
            Value::Int(_) => "int".into(),
            Value::Float(_) => "float".into(),
            Value::Str(_) => "str".into(),
            Value::Bytes(_) => "bytes".into(),
            Value::DateTime(_) => "datetime".into(),
            Value::Date(_) => "date".into(),
            Value::List(_) => "list".into(),
            Value::Map(_) => "map".into(),
            Value::OrderedMap(_) => "omap".into(),
            Value::Set(_) => "set".into(),
            Value::Deque(_) => "deque".into(),
            Value::Array(_) => "ndarray".into(),
            Value::Custom(c) => format!("custom value '{}'", c.type_id()),
        }
    }

    /// Returns `true` for values that pass through the converter unchanged.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::Bytes(_) => 5,
            Value::DateTime(_) => 6,
            Value::Date(_) => 7,
            Value::List(_) => 8,
            Value::Map(_) => 9,
            Value::OrderedMap(_) => 10,
            Value::Set(_) => 11,
            Value::Deque(_) => 12,
            Value::Array(_) => 13,
            Value::Custom(_) => 14,
        }
    }
}

// Value carries floats and lives inside BTreeSet, so it needs a total
// order. Floats compare via OrderedFloat (NaN == NaN); generic maps by
// sorted entries; custom values by type id, then debug form.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => OrderedFloat(*a).cmp(&OrderedFloat(*b)),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Map(a), Value::Map(b)) => cmp_maps(a, b),
            (Value::OrderedMap(a), Value::OrderedMap(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Deque(a), Value::Deque(b)) => a.iter().cmp(b.iter()),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::Custom(a), Value::Custom(b)) => a
                .type_id()
                .cmp(b.type_id())
                .then_with(|| format!("{a:?}").cmp(&format!("{b:?}"))),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

fn cmp_maps(a: &HashMap<String, Value>, b: &HashMap<String, Value>) -> Ordering {
    let mut left: Vec<_> = a.iter().collect();
    let mut right: Vec<_> = b.iter().collect();
    left.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
    right.sort_by(|(k1, _), (k2, _)| k1.cmp(k2));
    left.iter()
        .map(|(k, v)| (*k, *v))
        .cmp(right.iter().map(|(k, v)| (*k, *v)))
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(map: HashMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<OrderedMap> for Value {
    fn from(map: OrderedMap) -> Self {
        Value::OrderedMap(map)
    }
}

impl From<BTreeSet<Value>> for Value {
    fn from(set: BTreeSet<Value>) -> Self {
        Value::Set(set)
    }
}

impl From<VecDeque<Value>> for Value {
    fn from(q: VecDeque<Value>) -> Self {
        Value::Deque(q)
    }
}

impl From<NumArray> for Value {
    fn from(a: NumArray) -> Self {
        Value::Array(a)
    }
}

impl From<CustomValue> for Value {
    fn from(c: CustomValue) -> Self {
        Value::Custom(c)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}
