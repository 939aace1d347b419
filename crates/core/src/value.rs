//! Form values and the accumulated wizard value map.
//!
//! Values arrive from form inputs as JSON scalars or arrays. They are
//! held in a small closed [`Value`] enum; numbers use
//! `rust_decimal::Decimal`, never `f64`.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

/// Key holding the cluster name.
pub const KEY_NAME: &str = "name";
/// Key holding the selected region id.
pub const KEY_REGION: &str = "region_id";
/// Key holding the selected product id.
pub const KEY_PRODUCT: &str = "product_id";
/// Key holding the requested reservation length (or an absolute timestamp).
pub const KEY_EXPIRATION: &str = "reservation_expiration";

/// Keys that are owned by the wizard itself rather than by any product
/// parameter. They are stripped from `product_params` on submission.
pub const RESERVED_KEYS: [&str; 4] = [KEY_NAME, KEY_REGION, KEY_PRODUCT, KEY_EXPIRATION];

/// Returns true for the four wizard-owned keys.
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// A single submitted form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Number(Decimal),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Returns a human-readable type name for log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::List(_) => "List",
        }
    }

    /// Form truthiness: `false`, `0`, empty text and empty lists are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => !n.is_zero(),
            Value::Text(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
        }
    }

    /// Numeric view of the value. Text counts as numeric when it parses
    /// as a decimal (form inputs frequently deliver numbers as strings).
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_decimal(s.trim()),
            Value::Bool(_) | Value::List(_) => None,
        }
    }

    /// Non-negative whole number view, used for ids and node counts.
    pub fn as_u64(&self) -> Option<u64> {
        let d = self.as_decimal()?;
        if d.is_sign_negative() && !d.is_zero() {
            return None;
        }
        if !d.fract().is_zero() {
            return None;
        }
        u64::try_from(d).ok()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a JSON form value. `null` and objects have no form
    /// representation and yield `None`; list elements of either kind
    /// are dropped.
    pub fn from_json(v: &serde_json::Value) -> Option<Value> {
        match v {
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => parse_decimal(&n.to_string()).map(Value::Number),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Array(items) => {
                Some(Value::List(items.iter().filter_map(Value::from_json).collect()))
            }
        }
    }

    /// Plain JSON rendering. Whole numbers become JSON integers, other
    /// numbers are rendered through their decimal string.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => {
                if n.fract().is_zero() {
                    if let Ok(i) = i64::try_from(*n) {
                        return serde_json::Value::from(i);
                    }
                }
                n.normalize()
                    .to_string()
                    .parse::<serde_json::Number>()
                    .map(serde_json::Value::Number)
                    .unwrap_or_else(|_| serde_json::Value::String(n.to_string()))
            }
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n.normalize()),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Number(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

// ──────────────────────────────────────────────
// Wizard values
// ──────────────────────────────────────────────

/// Parameter variable -> most recently submitted value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardValues(pub BTreeMap<String, Value>);

impl WizardValues {
    pub fn new() -> Self {
        WizardValues(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True when the key is present with a truthy value.
    pub fn is_set(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(Value::is_truthy)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert, convenient for assembling step submissions.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Everything except the wizard-owned reserved keys.
    pub fn product_params(&self) -> WizardValues {
        WizardValues(
            self.0
                .iter()
                .filter(|(k, _)| !is_reserved_key(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Plain JSON object rendering.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for WizardValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        WizardValues(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
