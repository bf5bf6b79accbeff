use std::fmt;

use serde::Deserialize;

/// A scalar as delivered by a data source. Grid cells only hold strings, so
/// every value is rendered with [`ScalarValue::to_cell`] before it is written.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    Utf8(String),
    Null,
}

impl ScalarValue {
    pub fn to_cell(&self) -> String {
        match self {
            ScalarValue::Boolean(b) => b.to_string(),
            ScalarValue::Int64(i) => i.to_string(),
            ScalarValue::Float64(f) => f.to_string(),
            ScalarValue::Utf8(s) => s.clone(),
            ScalarValue::Null => String::new(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Utf8(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cell())
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::Utf8(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::Utf8(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        ScalarValue::Int64(i)
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        ScalarValue::Float64(f)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Boolean(b)
    }
}

/// Field name to value mapping that remembers insertion order, so the first
/// time a field is seen decides where its column lands.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct Record {
    fields: Vec<(String, ScalarValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field`, replacing an existing value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<ScalarValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&ScalarValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Cell text for `field`, empty when the field is missing.
    pub fn cell(&self, field: &str) -> String {
        self.get(field).map(ScalarValue::to_cell).unwrap_or_default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<ScalarValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .map(|(k, v)| (k, ScalarValue::from(v)))
            .collect()
    }
}

impl From<serde_json::Value> for ScalarValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ScalarValue::Null,
            serde_json::Value::Bool(b) => ScalarValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ScalarValue::Int64(i),
                None => ScalarValue::Float64(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ScalarValue::Utf8(s),
            // Nested values are kept as their JSON text.
            other => ScalarValue::Utf8(other.to_string()),
        }
    }
}

/// Union of field names across `records`, in first-seen order.
pub fn header_union(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for name in record.field_names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}
